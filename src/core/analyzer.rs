// src/core/analyzer.rs
//
// High-level recitation analysis API with builder pattern.

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use std::path::Path;

use super::analysis::{detect_ghunna, detect_madd};
use super::decoder::{load_waveform, LoadOptions, Waveform};
use super::visualization::{render_mel_spectrogram, SpectrogramConfig};
use crate::config::DetectionConfig;
use crate::detection::RecitationReport;
use crate::error::DetectionResult;

/// Builder for RecitationAnalyzer configuration
pub struct AnalyzerBuilder {
    config: DetectionConfig,
    load_options: LoadOptions,
}

impl AnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
            load_options: LoadOptions::default(),
        }
    }

    pub fn config(mut self, config: DetectionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    pub fn target_sample_rate(mut self, sample_rate: Option<u32>) -> Self {
        self.load_options.target_sample_rate = sample_rate;
        self
    }

    /// Validate the configuration and build the analyzer
    pub fn build(self) -> DetectionResult<RecitationAnalyzer> {
        self.config.validate()?;
        Ok(RecitationAnalyzer {
            config: self.config,
            load_options: self.load_options,
        })
    }
}

impl Default for AnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs both detectors over a waveform and assembles a report
pub struct RecitationAnalyzer {
    config: DetectionConfig,
    load_options: LoadOptions,
}

impl RecitationAnalyzer {
    /// Create analyzer with default configuration
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
            load_options: LoadOptions::default(),
        }
    }

    /// Create a builder for custom configuration
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Analyze an in-memory waveform
    pub fn analyze(&self, waveform: &Waveform, source: &str) -> DetectionResult<RecitationReport> {
        let (madd, ghunna) = if self.config.parallel {
            rayon::join(
                || detect_madd(waveform, &self.config.madd),
                || detect_ghunna(waveform, &self.config.ghunna),
            )
        } else {
            (
                detect_madd(waveform, &self.config.madd),
                detect_ghunna(waveform, &self.config.ghunna),
            )
        };

        let report = RecitationReport {
            source: source.to_string(),
            sample_rate: waveform.sample_rate,
            duration_secs: waveform.duration_secs(),
            profile: self.config.preset,
            madd: madd?,
            ghunna: ghunna?,
            analyzed_at: Utc::now(),
        };

        info!(
            "{}: madd={} ghunna={} (variance {:.2})",
            source, report.madd.detected, report.ghunna.detected, report.ghunna.variance
        );

        Ok(report)
    }

    /// Load a file and analyze it
    pub fn analyze_file(&self, path: &Path) -> Result<(Waveform, RecitationReport)> {
        let waveform = self.load(path)?;
        let report = self
            .analyze(&waveform, &path.display().to_string())
            .with_context(|| format!("Analysis failed for {}", path.display()))?;
        Ok((waveform, report))
    }

    /// Decode a file using this analyzer's load options
    pub fn load(&self, path: &Path) -> Result<Waveform> {
        load_waveform(path, &self.load_options)
    }

    /// Render a mel spectrogram of `waveform`
    pub fn render_spectrogram(&self, waveform: &Waveform, output_path: &Path) -> Result<()> {
        render_mel_spectrogram(waveform, &SpectrogramConfig::default(), output_path)
            .with_context(|| format!("Failed to write spectrogram: {}", output_path.display()))
    }
}

impl Default for RecitationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;
    use crate::error::{DetectionError, InputError};

    fn pulses() -> Waveform {
        let sr = 16000;
        let mut samples = vec![0.0f32; sr];
        for start in [3200usize, 11200] {
            for s in &mut samples[start..start + 1600] {
                *s = 0.5;
            }
        }
        Waveform::new(samples, sr as u32)
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let wave = pulses();
        let sequential = RecitationAnalyzer::new().analyze(&wave, "seq").unwrap();
        let parallel = RecitationAnalyzer::builder()
            .parallel(true)
            .build()
            .unwrap()
            .analyze(&wave, "par")
            .unwrap();

        assert_eq!(sequential.madd, parallel.madd);
        assert_eq!(sequential.ghunna, parallel.ghunna);
        assert!(sequential.madd.detected);
    }

    #[test]
    fn test_builder_validates() {
        let config = ConfigBuilder::new().build().unwrap();
        let mut bad = config.clone();
        bad.madd.hop_ms = 0.0;
        assert!(RecitationAnalyzer::builder().config(bad).build().is_err());
        assert!(RecitationAnalyzer::builder().config(config).build().is_ok());
    }

    #[test]
    fn test_empty_waveform_error_propagates() {
        let err = RecitationAnalyzer::new()
            .analyze(&Waveform::new(vec![], 16000), "empty")
            .unwrap_err();
        assert_eq!(err, DetectionError::Input(InputError::EmptyWaveform));
    }

    #[test]
    fn test_report_metadata() {
        let report = RecitationAnalyzer::new().analyze(&pulses(), "pulses.wav").unwrap();
        assert_eq!(report.source, "pulses.wav");
        assert_eq!(report.sample_rate, 16000);
        assert!((report.duration_secs - 1.0).abs() < 1e-12);
    }
}
