// src/core/decoder.rs
//
// Audio loading: decode any Symphonia-supported file to a mono waveform.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use rubato::{FftFixedInOut, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use std::fs::File;
use std::path::Path;

/// Mono audio samples with their sample rate.
///
/// Built once by the caller and lent read-only to each detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Options for loading audio
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Resample to this rate; the file's native rate is kept when unset
    pub target_sample_rate: Option<u32>,
}

/// Decode an audio file into a mono waveform
pub fn load_waveform(path: &Path, options: &LoadOptions) -> Result<Waveform> {
    info!("Loading file from: {}", path.display());

    let (interleaved, sample_rate, channels) = decode_interleaved(path)?;
    let mut samples = downmix(&interleaved, channels);

    let sample_rate = match options.target_sample_rate {
        Some(target) if target != sample_rate => {
            debug!("Resampling {} Hz -> {} Hz", sample_rate, target);
            samples = resample(&samples, sample_rate, target)?;
            target
        }
        _ => sample_rate,
    };

    Ok(Waveform::new(samples, sample_rate))
}

/// Decode to interleaved f32 samples, returning `(samples, sample_rate, channels)`
fn decode_interleaved(path: &Path) -> Result<(Vec<f32>, u32, usize)> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let mut probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe file format - may be corrupted or unsupported")?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No supported audio track found in file")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("File does not specify sample rate")?;
    if sample_rate == 0 {
        bail!("File reports a sample rate of 0 Hz");
    }

    let channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1);
    if channels == 0 {
        bail!("File reports 0 audio channels");
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder for audio codec")?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match probed.format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(symphonia::core::errors::Error::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(buf) => buf,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                debug!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            buf.copy_interleaved_ref(decoded);
            samples.extend_from_slice(buf.samples());
        }
    }

    if samples.is_empty() {
        bail!("No audio samples decoded from file");
    }

    debug!(
        "Decoded {} samples ({} channel(s) at {} Hz)",
        samples.len(),
        channels,
        sample_rate
    );

    Ok((samples, sample_rate, channels))
}

/// Average interleaved channels down to mono
pub fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Resample mono audio, compensating for the resampler's delay
pub fn resample(samples: &[f32], from: u32, to: u32) -> Result<Vec<f32>> {
    if from == to || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedInOut::<f64>::new(from as usize, to as usize, 1024, 1)
        .context("Failed to create resampler")?;

    let delay = resampler.output_delay();
    let expected = (samples.len() as f64 * to as f64 / from as f64).round() as usize;
    let input: Vec<f64> = samples.iter().map(|&s| s as f64).collect();

    let mut output: Vec<f64> = Vec::with_capacity(expected + delay);
    let mut pos = 0;
    while output.len() < expected + delay {
        let needed = resampler.input_frames_next();
        let mut chunk = vec![0.0f64; needed];
        if pos < input.len() {
            let end = (pos + needed).min(input.len());
            chunk[..end - pos].copy_from_slice(&input[pos..end]);
        }
        pos += needed;

        let processed = resampler
            .process(&[chunk], None)
            .context("Resampling failed")?;
        output.extend_from_slice(&processed[0]);
    }

    Ok(output[delay..delay + expected]
        .iter()
        .map(|&s| s as f32)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix() {
        let mono = downmix(&[0.5, -0.5, 0.3, 0.1], 2);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.0).abs() < 0.001);
        assert!((mono[1] - 0.2).abs() < 0.001);

        assert_eq!(downmix(&[0.1, 0.2], 1), vec![0.1, 0.2]);
    }

    #[test]
    fn test_waveform_duration() {
        let wave = Waveform::new(vec![0.0; 8000], 16000);
        assert!((wave.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(Waveform::new(vec![0.0; 10], 0).duration_secs(), 0.0);
    }

    #[test]
    fn test_resample_length() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let out = resample(&samples, 44100, 16000).unwrap();
        assert_eq!(out.len(), 16000);
        // Energy of the tone survives
        let rms = (out[2000..14000].iter().map(|s| s * s).sum::<f32>() / 12000.0).sqrt();
        assert!((rms - std::f32::consts::FRAC_1_SQRT_2).abs() < 0.05);
    }

    #[test]
    fn test_missing_file() {
        let err = load_waveform(Path::new("does/not/exist.wav"), &LoadOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }
}
