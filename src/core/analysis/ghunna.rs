// src/core/analysis/ghunna.rs
//
// Ghunna (nasalization) detection from the spread of low-order cepstra.
//
// Coefficients 1 and 2 summarize the coarse spectral tilt; coefficient 0
// (overall log-energy) is excluded. Their pooled population variance is
// compared against a fixed, inclusive band. The band only holds for the
// cepstral parameterization it was calibrated with.

use log::debug;

use super::mfcc::{compute_mfcc, CepstralMatrix};
use crate::config::{GhunnaConfig, GhunnaMode};
use crate::core::decoder::Waveform;
use crate::core::dsp::population_variance;
use crate::detection::GhunnaResult;
use crate::error::{ConfigurationError, DetectionResult};

/// First and last cepstral rows of the low-frequency band
pub const LOW_BAND: (usize, usize) = (1, 2);

/// Pooled population variance of rows 1..=2
pub fn low_band_variance(cepstra: &CepstralMatrix) -> f64 {
    population_variance(cepstra.band(LOW_BAND.0, LOW_BAND.1))
}

/// Apply the decision rule of `mode` to a variance
pub fn classify_variance(variance: f64, mode: &GhunnaMode) -> (bool, (f64, f64)) {
    match *mode {
        GhunnaMode::FixedBand {
            min_threshold,
            max_threshold,
        } => (
            min_threshold <= variance && variance <= max_threshold,
            (min_threshold, max_threshold),
        ),
        GhunnaMode::DynamicThreshold { threshold_factor } => {
            let threshold = variance * threshold_factor;
            (variance < threshold, (threshold, threshold))
        }
    }
}

/// Detect Ghunna in a waveform.
///
/// Configuration is validated before any audio is processed. Transform
/// failures are returned unchanged.
pub fn detect_ghunna(waveform: &Waveform, config: &GhunnaConfig) -> DetectionResult<GhunnaResult> {
    config.validate()?;
    if config.mfcc.num_coefficients <= LOW_BAND.1 {
        return Err(ConfigurationError::BandOutOfRange {
            first: LOW_BAND.0,
            last: LOW_BAND.1,
            available: config.mfcc.num_coefficients,
        }
        .into());
    }

    let cepstra = compute_mfcc(waveform, &config.mfcc)?;
    let variance = low_band_variance(&cepstra);
    let (detected, threshold_band) = classify_variance(variance, &config.mode);

    debug!(
        "Ghunna: variance {:.2} over {} frames, band {:?} ({})",
        variance,
        cepstra.num_frames(),
        threshold_band,
        config.mode.name()
    );

    Ok(GhunnaResult {
        detected,
        variance,
        threshold_band,
        mode: config.mode.name(),
        frames: cepstra.num_frames(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::MfccParams;
    use crate::error::{DetectionError, InputError};

    #[test]
    fn test_band_is_inclusive() {
        let mode = GhunnaMode::FixedBand {
            min_threshold: 15800.0,
            max_threshold: 19200.0,
        };
        assert!(classify_variance(15800.0, &mode).0);
        assert!(classify_variance(19200.0, &mode).0);
        assert!(classify_variance(17000.0, &mode).0);
        assert!(!classify_variance(15799.999, &mode).0);
        assert!(!classify_variance(19200.001, &mode).0);
        assert_eq!(classify_variance(0.0, &mode).1, (15800.0, 19200.0));
    }

    #[test]
    fn test_dynamic_threshold() {
        let mode = GhunnaMode::DynamicThreshold {
            threshold_factor: 1.5,
        };
        let (detected, band) = classify_variance(100.0, &mode);
        assert!(detected);
        assert_eq!(band, (150.0, 150.0));

        // Zero variance never falls below its own proportional threshold
        assert!(!classify_variance(0.0, &mode).0);
    }

    #[test]
    fn test_low_band_variance_excludes_energy_row() {
        let cepstra = CepstralMatrix {
            coefficients: vec![
                vec![-1000.0, 1000.0],
                vec![1.0, 3.0],
                vec![5.0, 7.0],
                vec![99.0, -99.0],
            ],
        };
        assert!((low_band_variance(&cepstra) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_inverted_band_fails_before_processing() {
        let config = GhunnaConfig {
            mode: GhunnaMode::FixedBand {
                min_threshold: 19200.0,
                max_threshold: 15800.0,
            },
            ..GhunnaConfig::default()
        };
        // An empty waveform would be an input error; the config error comes first
        let err = detect_ghunna(&Waveform::new(vec![], 16000), &config).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::Configuration(ConfigurationError::InvertedBand { .. })
        ));
    }

    #[test]
    fn test_too_few_coefficients() {
        let config = GhunnaConfig {
            mfcc: MfccParams {
                num_coefficients: 2,
                ..MfccParams::default()
            },
            ..GhunnaConfig::default()
        };
        let err = detect_ghunna(&Waveform::new(vec![0.0; 4096], 16000), &config).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::Configuration(ConfigurationError::BandOutOfRange { available: 2, .. })
        ));
    }

    #[test]
    fn test_silence_has_zero_variance() {
        let result = detect_ghunna(&Waveform::new(vec![0.0; 16000], 16000), &GhunnaConfig::default())
            .unwrap();
        assert!(result.variance.abs() < 1e-9);
        assert!(!result.detected);
        assert_eq!(result.frames, 1 + 16000 / 512);
        assert_eq!(result.mode, "fixed_band");
    }

    #[test]
    fn test_empty_waveform() {
        let err = detect_ghunna(&Waveform::new(vec![], 16000), &GhunnaConfig::default()).unwrap_err();
        assert_eq!(err, DetectionError::Input(InputError::EmptyWaveform));
    }
}
