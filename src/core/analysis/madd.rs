// src/core/analysis/madd.rs
//
// Madd (vowel elongation) detection from the short-term energy contour.
//
// Peaks are local maxima of frame energy at or above `mean * height_multiplier`;
// a spacing between consecutive peaks longer than the elongation threshold
// marks a sustained vowel.
//
// On an all-zero waveform the mean, and with it the height threshold, is
// zero. Any frame with positive energy that forms a local maximum would then
// qualify as a peak. Flat silence has no local maxima, so it reports nothing.

use log::debug;

use crate::config::MaddConfig;
use crate::core::decoder::Waveform;
use crate::core::dsp::{find_peaks, frames, mean, FrameParams};
use crate::detection::MaddResult;
use crate::error::{DetectionResult, InputError};

/// Sum of squared samples per frame
pub fn energy_contour(samples: &[f32], params: FrameParams) -> Vec<f64> {
    frames(samples, params.frame_length, params.hop_length)
        .map(|frame| frame.iter().map(|&s| (s as f64) * (s as f64)).sum())
        .collect()
}

/// Convert consecutive peak index gaps to seconds
pub fn peak_durations(peaks: &[usize], hop_length: usize, sample_rate: u32) -> Vec<f64> {
    let hop_secs = hop_length as f64 / sample_rate as f64;
    peaks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 * hop_secs)
        .collect()
}

/// Detect Madd in a waveform.
///
/// Fails on an empty waveform, a zero sample rate, or invalid parameters.
/// A waveform shorter than one frame yields no peaks and `detected == false`.
pub fn detect_madd(waveform: &Waveform, config: &MaddConfig) -> DetectionResult<MaddResult> {
    config.validate()?;
    if waveform.sample_rate == 0 {
        return Err(InputError::InvalidSampleRate { sample_rate: 0 }.into());
    }
    if waveform.samples.is_empty() {
        return Err(InputError::EmptyWaveform.into());
    }

    let params = FrameParams::from_millis(waveform.sample_rate, config.frame_ms, config.hop_ms)?;
    let energy = energy_contour(&waveform.samples, params);

    let threshold_height = mean(&energy).unwrap_or(0.0) * config.height_multiplier;
    let peaks = find_peaks(&energy, threshold_height);
    let durations = peak_durations(&peaks, params.hop_length, waveform.sample_rate);
    let detected = durations.iter().any(|&d| d > config.elongation_threshold_s);

    debug!(
        "Madd: {} frames, {} peaks above {:.4}, longest gap {:.3}s",
        energy.len(),
        peaks.len(),
        threshold_height,
        durations.iter().copied().fold(0.0, f64::max)
    );

    Ok(MaddResult {
        detected,
        durations,
        peaks,
        threshold_height,
        energy,
        frame_params: params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, DetectionError};

    const SR: u32 = 16000;

    #[test]
    fn test_energy_contour_values() {
        let samples = [1.0, 1.0, 2.0, 2.0, 0.0, 0.0];
        let params = FrameParams {
            frame_length: 2,
            hop_length: 2,
        };
        // floor((6 - 2) / 2) frames
        assert_eq!(energy_contour(&samples, params), vec![2.0, 8.0]);
    }

    #[test]
    fn test_peak_durations() {
        let durations = peak_durations(&[10, 50, 55], 160, SR);
        assert_eq!(durations.len(), 2);
        assert!((durations[0] - 0.4).abs() < 1e-12);
        assert!((durations[1] - 0.05).abs() < 1e-12);
        assert!(peak_durations(&[3], 160, SR).is_empty());
    }

    #[test]
    fn test_short_input_is_not_an_error() {
        let wave = Waveform::new(vec![0.5; 100], SR);
        let result = detect_madd(&wave, &MaddConfig::default()).unwrap();
        assert!(!result.detected);
        assert!(result.energy.is_empty());
        assert!(result.peaks.is_empty());
        assert!(result.durations.is_empty());
    }

    #[test]
    fn test_empty_input_fails() {
        let err = detect_madd(&Waveform::new(vec![], SR), &MaddConfig::default()).unwrap_err();
        assert_eq!(err, DetectionError::Input(InputError::EmptyWaveform));

        let err = detect_madd(&Waveform::new(vec![0.0; 10], 0), &MaddConfig::default()).unwrap_err();
        assert_eq!(
            err,
            DetectionError::Input(InputError::InvalidSampleRate { sample_rate: 0 })
        );
    }

    #[test]
    fn test_invalid_config_checked_first() {
        let config = MaddConfig {
            elongation_threshold_s: 0.0,
            ..MaddConfig::default()
        };
        // Config errors win even over an empty waveform
        let err = detect_madd(&Waveform::new(vec![], SR), &config).unwrap_err();
        assert!(matches!(
            err,
            DetectionError::Configuration(ConfigurationError::NonPositive {
                field: "elongation_threshold_s",
                ..
            })
        ));
    }

    #[test]
    fn test_two_pulses_detected() {
        // Two 50 ms pulses 0.5 s apart
        let mut samples = vec![0.0f32; SR as usize];
        for start in [4000usize, 12000] {
            for s in &mut samples[start..start + 800] {
                *s = 0.8;
            }
        }
        let result = detect_madd(&Waveform::new(samples, SR), &MaddConfig::default()).unwrap();
        assert_eq!(result.peaks.len(), 2);
        assert!((result.durations[0] - 0.5).abs() < 0.011);
        assert!(result.detected);
    }
}
