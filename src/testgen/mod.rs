// src/testgen/mod.rs
//
// Synthetic recitation-like signals for tests and demos.
//
// Oscillators use integer-exact phase, so a tone whose period divides the
// hop length produces bit-identical frames and a flat energy plateau.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::core::decoder::Waveform;

/// Number of harmonics in a synthetic vowel
const VOWEL_HARMONICS: u32 = 5;
/// Fade in/out applied to vowels
const VOWEL_FADE_SECS: f64 = 0.02;

/// Appends segments to build a test waveform
#[derive(Debug, Clone)]
pub struct SignalBuilder {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl SignalBuilder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
        }
    }

    fn num_samples(&self, secs: f64) -> usize {
        (secs * self.sample_rate as f64).round() as usize
    }

    /// Append digital silence
    pub fn silence(mut self, secs: f64) -> Self {
        let n = self.num_samples(secs);
        self.samples.extend(std::iter::repeat(0.0).take(n));
        self
    }

    /// Append a constant-amplitude sine
    pub fn tone(mut self, freq: f64, amplitude: f32, secs: f64) -> Self {
        let n = self.num_samples(secs);
        let sr = self.sample_rate;
        self.samples
            .extend((0..n).map(|i| amplitude * oscillator(freq, i, sr) as f32));
        self
    }

    /// Append a sustained vowel: a harmonic tone on `f0` whose envelope is
    /// stressed at onset and release and dips in the middle.
    pub fn sustained_vowel(mut self, f0: f64, amplitude: f32, secs: f64) -> Self {
        let n = self.num_samples(secs);
        let sr = self.sample_rate;
        let norm: f64 = (1..=VOWEL_HARMONICS).map(|h| 1.0 / h as f64).sum();

        self.samples.extend((0..n).map(|i| {
            let t = i as f64 / sr as f64;
            let fade = (t / VOWEL_FADE_SECS)
                .min((secs - t) / VOWEL_FADE_SECS)
                .clamp(0.0, 1.0);
            let body = 1.0 - 0.5 * (PI * t / secs).sin();
            let carrier: f64 = (1..=VOWEL_HARMONICS)
                .map(|h| oscillator(f0 * h as f64, i, sr) / h as f64)
                .sum::<f64>()
                / norm;
            (amplitude as f64 * fade * body * carrier) as f32
        }));
        self
    }

    pub fn build(self) -> Waveform {
        Waveform::new(self.samples, self.sample_rate)
    }
}

/// `sin(2*pi*freq*i/sr)` with the phase reduced exactly for integer `freq`
fn oscillator(freq: f64, i: usize, sample_rate: u32) -> f64 {
    let cycles = (i as f64 * freq) % sample_rate as f64;
    (2.0 * PI * cycles / sample_rate as f64).sin()
}

/// Multiply every sample by `gain`
pub fn scaled(waveform: &Waveform, gain: f32) -> Waveform {
    Waveform::new(
        waveform.samples.iter().map(|&s| s * gain).collect(),
        waveform.sample_rate,
    )
}

/// Write a waveform as 16-bit mono PCM WAV
pub fn write_wav(waveform: &Waveform, path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create WAV file: {}", path.display()))?;
    for &sample in &waveform.samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// The reference recitation fixture: 0.5 s silence, a 0.5 s sustained vowel
/// on 200 Hz, then 0.5 s silence, at 16 kHz.
pub fn reference_recitation() -> Waveform {
    SignalBuilder::new(16000)
        .silence(0.5)
        .sustained_vowel(200.0, 0.6, 0.5)
        .silence(0.5)
        .build()
}
