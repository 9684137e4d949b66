// src/core/analysis/mfcc.rs
//
// MFCC computation: centered STFT -> Slaney mel filterbank -> dB -> DCT-II

use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::core::decoder::Waveform;
use crate::core::dsp::{
    apply_filterbank, mel_filterbank, power_to_db, StftProcessor, WindowType,
};
use crate::error::{ConfigurationError, DetectionResult, InputError, TransformError};

/// MFCC analysis parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MfccParams {
    pub num_coefficients: usize,
    pub num_mel_bands: usize,
    pub fft_size: usize,
    pub hop_size: usize,
    /// Lowest filterbank edge in Hz
    pub fmin: f64,
    /// Highest filterbank edge in Hz, Nyquist when unset
    pub fmax: Option<f64>,
    /// Power floor before taking the log
    pub amin: f64,
    /// Dynamic range kept below the loudest bin, unlimited when unset
    pub top_db: Option<f64>,
}

impl Default for MfccParams {
    fn default() -> Self {
        Self {
            num_coefficients: 20,
            num_mel_bands: 128,
            fft_size: 2048,
            hop_size: 512,
            fmin: 0.0,
            fmax: None,
            amin: 1e-10,
            top_db: Some(80.0),
        }
    }
}

impl MfccParams {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("num_coefficients", self.num_coefficients),
            ("num_mel_bands", self.num_mel_bands),
            ("fft_size", self.fft_size),
            ("hop_size", self.hop_size),
        ] {
            if value == 0 {
                return Err(ConfigurationError::NonPositive { field, value: 0.0 });
            }
        }
        if !(self.amin > 0.0) {
            return Err(ConfigurationError::NonPositive {
                field: "amin",
                value: self.amin,
            });
        }
        if let Some(top_db) = self.top_db {
            if !(top_db > 0.0) {
                return Err(ConfigurationError::NonPositive {
                    field: "top_db",
                    value: top_db,
                });
            }
        }
        Ok(())
    }
}

/// Cepstral coefficients laid out as `num_coefficients x frames`.
/// Row 0 tracks overall log-energy; higher rows describe finer spectral shape.
#[derive(Debug, Clone, Default)]
pub struct CepstralMatrix {
    pub coefficients: Vec<Vec<f64>>,
}

impl CepstralMatrix {
    pub fn num_coefficients(&self) -> usize {
        self.coefficients.len()
    }

    pub fn num_frames(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.coefficients.get(index).map(Vec::as_slice)
    }

    /// Values of rows `first..=last`, row by row
    pub fn band(&self, first: usize, last: usize) -> impl Iterator<Item = f64> + Clone + '_ {
        self.coefficients[first..=last].iter().flatten().copied()
    }
}

/// Log-power mel spectrogram in dB, laid out as `frames x mel bands`
pub fn log_mel_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    params: &MfccParams,
) -> Result<Vec<Vec<f64>>, TransformError> {
    let stft = StftProcessor::new(params.fft_size, params.hop_size, WindowType::Hann);
    let fmax = params.fmax.unwrap_or(sample_rate as f64 / 2.0);
    let filterbank = mel_filterbank(
        sample_rate,
        params.fft_size,
        params.num_mel_bands,
        params.fmin,
        fmax,
    );

    let mut mel_db: Vec<Vec<f64>> = stft
        .power_spectrogram(samples)?
        .iter()
        .map(|power| {
            apply_filterbank(power, &filterbank)
                .into_iter()
                .map(|p| power_to_db(p, params.amin))
                .collect()
        })
        .collect();

    if let Some(top_db) = params.top_db {
        let peak = mel_db
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let floor = peak - top_db;
        for value in mel_db.iter_mut().flatten() {
            *value = value.max(floor);
        }
    }

    Ok(mel_db)
}

/// Compute the MFCC matrix of a waveform
pub fn compute_mfcc(waveform: &Waveform, params: &MfccParams) -> DetectionResult<CepstralMatrix> {
    params.validate()?;
    if waveform.sample_rate == 0 {
        return Err(InputError::InvalidSampleRate { sample_rate: 0 }.into());
    }
    if waveform.samples.is_empty() {
        return Err(InputError::EmptyWaveform.into());
    }

    let mel_db = log_mel_spectrogram(&waveform.samples, waveform.sample_rate, params)?;
    let basis = dct_basis(params.num_coefficients, params.num_mel_bands);

    let mut coefficients = vec![Vec::with_capacity(mel_db.len()); params.num_coefficients];
    for frame in &mel_db {
        for (row, weights) in coefficients.iter_mut().zip(&basis) {
            row.push(weights.iter().zip(frame).map(|(w, x)| w * x).sum());
        }
    }

    debug!(
        "MFCC: {} coefficients x {} frames (n_fft {}, hop {}, {} mel bands)",
        params.num_coefficients,
        mel_db.len(),
        params.fft_size,
        params.hop_size,
        params.num_mel_bands
    );

    Ok(CepstralMatrix { coefficients })
}

/// Orthonormal DCT-II basis, `num_coefficients x n`
fn dct_basis(num_coefficients: usize, n: usize) -> Vec<Vec<f64>> {
    let n_f = n as f64;
    (0..num_coefficients)
        .map(|k| {
            let scale = if k == 0 {
                (1.0 / n_f).sqrt()
            } else {
                (2.0 / n_f).sqrt()
            };
            (0..n)
                .map(|i| scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n_f)).cos())
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectionError;

    fn tone(freq: f64, amplitude: f32, secs: f64, sample_rate: u32) -> Waveform {
        let n = (secs * sample_rate as f64) as usize;
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin() as f32)
            .collect();
        Waveform::new(samples, sample_rate)
    }

    #[test]
    fn test_matrix_shape() {
        let wave = tone(220.0, 0.5, 1.0, 22050);
        let mfcc = compute_mfcc(&wave, &MfccParams::default()).unwrap();
        assert_eq!(mfcc.num_coefficients(), 20);
        assert_eq!(mfcc.num_frames(), 1 + 22050 / 512);
        assert_eq!(mfcc.band(1, 2).count(), 2 * mfcc.num_frames());
    }

    #[test]
    fn test_dct_basis_orthonormal() {
        let basis = dct_basis(8, 8);
        for a in 0..8 {
            for b in 0..8 {
                let dot: f64 = basis[a].iter().zip(&basis[b]).map(|(x, y)| x * y).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_silence_is_flat() {
        // All bins hit the power floor, so only the energy row is non-zero
        let wave = Waveform::new(vec![0.0; 4096], 16000);
        let mfcc = compute_mfcc(&wave, &MfccParams::default()).unwrap();
        let floor_db = -100.0;
        let expected_c0 = floor_db * (128.0f64).sqrt();
        for &c0 in mfcc.row(0).unwrap() {
            assert!((c0 - expected_c0).abs() < 1e-6);
        }
        assert!(mfcc.band(1, 19).all(|c| c.abs() < 1e-6));
    }

    #[test]
    fn test_top_db_clamps_floor() {
        let wave = tone(440.0, 0.8, 0.5, 16000);
        let params = MfccParams::default();
        let mel_db = log_mel_spectrogram(&wave.samples, wave.sample_rate, &params).unwrap();
        let max = mel_db.iter().flatten().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = mel_db.iter().flatten().copied().fold(f64::INFINITY, f64::min);
        assert!(max - min <= 80.0 + 1e-9);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        let params = MfccParams::default();
        let err = compute_mfcc(&Waveform::new(vec![], 16000), &params).unwrap_err();
        assert_eq!(err, DetectionError::from(InputError::EmptyWaveform));

        let err = compute_mfcc(&Waveform::new(vec![0.0, f32::INFINITY], 16000), &params).unwrap_err();
        assert_eq!(err, DetectionError::from(TransformError::NonFiniteInput));

        let bad = MfccParams {
            num_mel_bands: 0,
            ..MfccParams::default()
        };
        let err = compute_mfcc(&Waveform::new(vec![0.0; 100], 16000), &bad).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::Configuration(ConfigurationError::NonPositive {
                field: "num_mel_bands",
                ..
            })
        ));
    }
}
