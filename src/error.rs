// src/error.rs
//
// Error taxonomy for the recitation detectors.

use thiserror::Error;

/// Main error type returned by the Madd and Ghunna detectors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Problems with the waveform handed to a detector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Waveform contains no samples")]
    EmptyWaveform,

    #[error("Invalid sample rate: {sample_rate} Hz")]
    InvalidSampleRate { sample_rate: u32 },
}

/// Invalid detector parameters, raised before any audio is processed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("Threshold band is inverted: min {min} > max {max}")]
    InvertedBand { min: f64, max: f64 },

    #[error("{field} resolves to zero samples at {sample_rate} Hz")]
    ZeroLengthFrame { field: &'static str, sample_rate: u32 },

    #[error("Coefficient band {first}..={last} is outside the {available} computed coefficients")]
    BandOutOfRange { first: usize, last: usize, available: usize },
}

/// Failures inside the cepstral/spectral transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Waveform contains non-finite samples")]
    NonFiniteInput,

    #[error("FFT failed: {0}")]
    Fft(String),

    #[error("Transform produced no frames")]
    NoFrames,
}

pub type DetectionResult<T> = std::result::Result<T, DetectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: DetectionError = ConfigurationError::InvertedBand { min: 2.0, max: 1.0 }.into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Threshold band is inverted: min 2 > max 1"
        );

        let err: DetectionError = InputError::EmptyWaveform.into();
        assert!(matches!(err, DetectionError::Input(InputError::EmptyWaveform)));
    }
}
