// src/core/visualization/spectrogram.rs
//
// Mel spectrogram rendering for visual inspection of Madd and Ghunna

use anyhow::{bail, Result};
use image::{ImageBuffer, Rgb};
use std::path::Path;

use crate::core::analysis::{log_mel_spectrogram, MfccParams};
use crate::core::decoder::Waveform;

/// Spectrogram configuration
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    pub width: u32,
    pub height: u32,
    pub fft_size: usize,
    pub hop_size: usize,
    pub num_mel_bands: usize,
    /// Dynamic range shown below the loudest bin
    pub top_db: f64,
    pub colormap: Colormap,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
            fft_size: 2048,
            hop_size: 512,
            num_mel_bands: 128,
            top_db: 80.0,
            colormap: Colormap::Viridis,
        }
    }
}

/// Color map for spectrogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    #[default]
    Viridis,
    Grayscale,
}

impl Colormap {
    fn color(&self, value: f64) -> Rgb<u8> {
        let v = value.clamp(0.0, 1.0);
        match self {
            Colormap::Viridis => {
                let r = (68.0 + v * (253.0 - 68.0)) as u8;
                let g = (1.0 + v * (231.0 - 1.0)) as u8;
                let b = (84.0 + v * (37.0 - 84.0) + (1.0 - v) * v * 150.0) as u8;
                Rgb([r, g, b])
            }
            Colormap::Grayscale => {
                let g = (v * 255.0) as u8;
                Rgb([g, g, g])
            }
        }
    }
}

/// Mel power spectrogram in dB relative to its maximum, laid out as
/// `frames x mel bands`. Values lie in `[-top_db, 0]`.
pub fn mel_spectrogram_db(waveform: &Waveform, config: &SpectrogramConfig) -> Result<Vec<Vec<f64>>> {
    if waveform.is_empty() || waveform.sample_rate == 0 {
        bail!("Audio too short for spectrogram generation");
    }

    let params = MfccParams {
        num_mel_bands: config.num_mel_bands,
        fft_size: config.fft_size,
        hop_size: config.hop_size,
        top_db: Some(config.top_db),
        ..MfccParams::default()
    };
    let mut mel_db = log_mel_spectrogram(&waveform.samples, waveform.sample_rate, &params)?;

    let peak = mel_db
        .iter()
        .flatten()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    for value in mel_db.iter_mut().flatten() {
        *value -= peak;
    }

    Ok(mel_db)
}

/// Render a mel spectrogram of `waveform` to a PNG at `output_path`
pub fn render_mel_spectrogram(
    waveform: &Waveform,
    config: &SpectrogramConfig,
    output_path: &Path,
) -> Result<()> {
    let mel_db = mel_spectrogram_db(waveform, config)?;
    let num_frames = mel_db.len();
    let num_bands = config.num_mel_bands;

    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(config.width, config.height);

    let x_scale = num_frames as f64 / config.width as f64;
    let y_scale = num_bands as f64 / config.height as f64;

    for y in 0..config.height {
        // Flip Y for display (low bands at bottom)
        let band = (((config.height - 1 - y) as f64 * y_scale) as usize).min(num_bands - 1);
        for x in 0..config.width {
            let frame = ((x as f64 * x_scale) as usize).min(num_frames - 1);
            let normalized = (mel_db[frame][band] + config.top_db) / config.top_db;
            img.put_pixel(x, y, config.colormap.color(normalized));
        }
    }

    img.save(output_path)?;
    Ok(())
}
