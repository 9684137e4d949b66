// src/config/profiles.rs
//
// Detection configuration with named, documented thresholds.
//
// The fixed Ghunna band (15800..=19200) was calibrated against cepstra
// computed with the default `MfccParams` at the recording's native sample
// rate. Changing the transform parameters or the sample rate invalidates the
// band; supply a recalibrated one through a config file instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::analysis::MfccParams;
use crate::error::ConfigurationError;

/// Madd (elongation) detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaddConfig {
    /// Energy frame length in milliseconds
    pub frame_ms: f64,
    /// Hop between energy frames in milliseconds
    pub hop_ms: f64,
    /// Peak height threshold as a multiple of the mean frame energy
    pub height_multiplier: f64,
    /// Inter-peak spacing (seconds) above which a vowel counts as elongated
    pub elongation_threshold_s: f64,
}

impl Default for MaddConfig {
    fn default() -> Self {
        Self {
            frame_ms: 25.0,
            hop_ms: 10.0,
            height_multiplier: 1.2,
            elongation_threshold_s: 0.3,
        }
    }
}

impl MaddConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        require_positive("frame_ms", self.frame_ms)?;
        require_positive("hop_ms", self.hop_ms)?;
        require_positive("height_multiplier", self.height_multiplier)?;
        require_positive("elongation_threshold_s", self.elongation_threshold_s)?;
        Ok(())
    }
}

/// How the low-band cepstral variance is turned into a Ghunna decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GhunnaMode {
    /// Detected when `min_threshold <= variance <= max_threshold`
    FixedBand { min_threshold: f64, max_threshold: f64 },
    /// Threshold is `variance * threshold_factor`; detected when the variance
    /// is below it. Kept as a separate profile because it is not equivalent
    /// to the fixed band.
    DynamicThreshold { threshold_factor: f64 },
}

impl Default for GhunnaMode {
    fn default() -> Self {
        Self::FixedBand {
            min_threshold: 15800.0,
            max_threshold: 19200.0,
        }
    }
}

impl GhunnaMode {
    pub fn name(&self) -> &'static str {
        match self {
            GhunnaMode::FixedBand { .. } => "fixed_band",
            GhunnaMode::DynamicThreshold { .. } => "dynamic_threshold",
        }
    }
}

/// Ghunna (nasalization) detector parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GhunnaConfig {
    /// Cepstral transform parameterization the thresholds were calibrated for
    pub mfcc: MfccParams,
    pub mode: GhunnaMode,
}

impl Default for GhunnaConfig {
    fn default() -> Self {
        Self {
            mfcc: MfccParams::default(),
            mode: GhunnaMode::default(),
        }
    }
}

impl GhunnaConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.mfcc.validate()?;

        match self.mode {
            GhunnaMode::FixedBand {
                min_threshold,
                max_threshold,
            } => {
                require_positive("min_threshold", min_threshold)?;
                require_positive("max_threshold", max_threshold)?;
                if min_threshold > max_threshold {
                    return Err(ConfigurationError::InvertedBand {
                        min: min_threshold,
                        max: max_threshold,
                    });
                }
            }
            GhunnaMode::DynamicThreshold { threshold_factor } => {
                require_positive("threshold_factor", threshold_factor)?;
            }
        }

        Ok(())
    }
}

/// Preset profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfilePreset {
    /// Fixed variance band, the calibrated default
    FixedBand,
    /// Proportional threshold alternative for Ghunna
    DynamicThreshold,
    /// User-defined settings
    Custom,
}

impl ProfilePreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "fixed_band" | "fixed" | "default" => Some(Self::FixedBand),
            "dynamic_threshold" | "dynamic" => Some(Self::DynamicThreshold),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProfilePreset::FixedBand => "fixed_band",
            ProfilePreset::DynamicThreshold => "dynamic_threshold",
            ProfilePreset::Custom => "custom",
        }
    }
}

/// Complete detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub preset: ProfilePreset,
    #[serde(default)]
    pub madd: MaddConfig,
    #[serde(default)]
    pub ghunna: GhunnaConfig,
    /// Run both detectors concurrently
    #[serde(default)]
    pub parallel: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self::from_preset(ProfilePreset::FixedBand)
    }
}

impl DetectionConfig {
    /// Create configuration from preset
    pub fn from_preset(preset: ProfilePreset) -> Self {
        let ghunna = match preset {
            ProfilePreset::DynamicThreshold => GhunnaConfig {
                mode: GhunnaMode::DynamicThreshold {
                    threshold_factor: 1.5,
                },
                ..GhunnaConfig::default()
            },
            ProfilePreset::FixedBand | ProfilePreset::Custom => GhunnaConfig::default(),
        };

        Self {
            preset,
            madd: MaddConfig::default(),
            ghunna,
            parallel: false,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.madd.validate()?;
        self.ghunna.validate()
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Rejected config file: {}", path.display()))?;
        debug!("Loaded detection config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `<config_dir>/tajweedcheck/config.json`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tajweedcheck").join("config.json"))
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    // Written so that NaN is rejected too
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { field, value })
    }
}

/// Builder for custom configurations
pub struct ConfigBuilder {
    config: DetectionConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DetectionConfig::default(),
        }
    }

    pub fn from_preset(preset: ProfilePreset) -> Self {
        Self {
            config: DetectionConfig::from_preset(preset),
        }
    }

    pub fn from_config(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn height_multiplier(mut self, multiplier: f64) -> Self {
        self.config.madd.height_multiplier = multiplier;
        self
    }

    pub fn elongation_threshold(mut self, seconds: f64) -> Self {
        self.config.madd.elongation_threshold_s = seconds;
        self
    }

    pub fn frame_ms(mut self, frame_ms: f64, hop_ms: f64) -> Self {
        self.config.madd.frame_ms = frame_ms;
        self.config.madd.hop_ms = hop_ms;
        self
    }

    pub fn variance_band(mut self, min_threshold: f64, max_threshold: f64) -> Self {
        self.config.ghunna.mode = GhunnaMode::FixedBand {
            min_threshold,
            max_threshold,
        };
        self
    }

    pub fn dynamic_threshold(mut self, threshold_factor: f64) -> Self {
        self.config.ghunna.mode = GhunnaMode::DynamicThreshold { threshold_factor };
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Validate and return the configuration
    pub fn build(mut self) -> Result<DetectionConfig, ConfigurationError> {
        let preset = DetectionConfig {
            parallel: self.config.parallel,
            ..DetectionConfig::from_preset(self.config.preset)
        };
        if self.config != preset {
            self.config.preset = ProfilePreset::Custom;
        }
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
