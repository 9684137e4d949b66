//! Recitation analysis algorithms
//!
//! - Madd: energy-contour peak spacing (vowel elongation)
//! - Ghunna: low-band cepstral variance (nasalization)
//! - MFCC: the cepstral transform Ghunna is computed from

mod ghunna;
mod madd;
mod mfcc;

pub use ghunna::{classify_variance, detect_ghunna, low_band_variance, LOW_BAND};
pub use madd::{detect_madd, energy_contour, peak_durations};
pub use mfcc::{compute_mfcc, log_mel_spectrogram, CepstralMatrix, MfccParams};
