//! Core analysis and detection modules

pub mod analysis;
pub mod analyzer;
pub mod decoder;
pub mod dsp;
pub mod visualization;

pub use analysis::{compute_mfcc, detect_ghunna, detect_madd, CepstralMatrix, MfccParams};
pub use analyzer::{AnalyzerBuilder, RecitationAnalyzer};
pub use decoder::{load_waveform, LoadOptions, Waveform};
