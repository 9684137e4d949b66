//! TajweedCheck - Detect Madd and Ghunna in recited audio
//!
//! Two signal-level heuristics over a mono waveform:
//!
//! - **Madd** (vowel elongation): peaks of the short-time energy contour,
//!   flagged when two consecutive peaks are further apart than a threshold.
//! - **Ghunna** (nasalization): pooled variance of the low-order MFCC
//!   coefficients, compared against a fixed band or a dynamic threshold.
//!
//! ## Module Structure
//!
//! - `core` - Decoding, DSP utilities, detectors, and the analyzer
//! - `cli` - Command-line interface
//! - `config` - Detection profiles and configuration
//! - `detection` - Detection result types
//! - `error` - Typed detection errors
//! - `testgen` - Synthetic signals for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tajweedcheck::{RecitationAnalyzer, ConfigBuilder, ProfilePreset};
//!
//! let config = ConfigBuilder::from_preset(ProfilePreset::FixedBand)
//!     .elongation_threshold(0.35)
//!     .build()?;
//! let analyzer = RecitationAnalyzer::builder().config(config).build()?;
//! let (_, report) = analyzer.analyze_file(path)?;
//!
//! println!("madd={} ghunna={}", report.madd.detected, report.ghunna.detected);
//! ```
//!
//! ## Detection Profiles
//!
//! | Profile           | Ghunna rule                                  |
//! |-------------------|----------------------------------------------|
//! | fixed-band        | `15800 <= variance <= 19200`                 |
//! | dynamic-threshold | `variance < variance * factor` (factor 1.5)  |

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and profiles
pub mod config;

// Detection result types
pub mod detection;

pub mod error;

// Synthetic signal generation
pub mod testgen;

pub use config::{ConfigBuilder, DetectionConfig, GhunnaConfig, GhunnaMode, MaddConfig, ProfilePreset};
pub use crate::core::{
    compute_mfcc, detect_ghunna, detect_madd, load_waveform, AnalyzerBuilder, CepstralMatrix,
    LoadOptions, MfccParams, RecitationAnalyzer, Waveform,
};
pub use detection::{GhunnaResult, MaddResult, RecitationReport};
pub use error::{ConfigurationError, DetectionError, DetectionResult, InputError, TransformError};
