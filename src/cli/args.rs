//! CLI argument parsing and configuration resolution

use anyhow::{bail, Result};
use clap::Parser;
use log::debug;
use std::path::PathBuf;

use crate::config::{default_config_path, ConfigBuilder, DetectionConfig, GhunnaMode, ProfilePreset};

#[derive(Parser, Debug)]
#[command(name = "tajweedcheck", version)]
#[command(about = "Detect Madd (elongation) and Ghunna (nasalization) in recited audio")]
pub struct Args {
    /// Input files or directories
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Detection profile: fixed-band or dynamic-threshold
    #[arg(short, long, default_value = "fixed-band", value_parser = parse_preset)]
    pub profile: ProfilePreset,

    /// JSON configuration file (replaces the profile defaults)
    #[arg(short, long, env = "TAJWEEDCHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Lower edge of the Ghunna variance band
    #[arg(long)]
    pub min_variance: Option<f64>,

    /// Upper edge of the Ghunna variance band
    #[arg(long)]
    pub max_variance: Option<f64>,

    /// Inter-peak spacing in seconds that counts as Madd
    #[arg(long)]
    pub elongation_threshold: Option<f64>,

    /// Resample audio to this rate (Hz) before analysis
    #[arg(long)]
    pub resample: Option<u32>,

    /// Generate mel spectrogram images
    #[arg(short, long)]
    pub spectrogram: bool,

    /// Output directory for spectrograms
    #[arg(short, long, default_value = "spectrograms")]
    pub output: PathBuf,

    /// Print reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Run the two detectors concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_preset(name: &str) -> Result<ProfilePreset, String> {
    ProfilePreset::from_name(name)
        .ok_or_else(|| format!("unknown profile '{}' (expected fixed-band or dynamic-threshold)", name))
}

/// Parse process arguments
pub fn parse_args() -> Args {
    Args::parse()
}

/// Build the effective detection configuration from a config file (explicit
/// or in the default location) or the chosen profile, then apply overrides.
pub fn resolve_config(args: &Args) -> Result<DetectionConfig> {
    let base = match &args.config {
        Some(path) => DetectionConfig::from_json_file(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => DetectionConfig::from_json_file(&path)?,
            None => DetectionConfig::from_preset(args.profile),
        },
    };
    debug!("Base configuration preset: {}", base.preset.name());

    let mut builder = ConfigBuilder::from_config(base.clone()).parallel(args.parallel || base.parallel);

    if let Some(seconds) = args.elongation_threshold {
        builder = builder.elongation_threshold(seconds);
    }

    if args.min_variance.is_some() || args.max_variance.is_some() {
        let (default_min, default_max) = match base.ghunna.mode {
            GhunnaMode::FixedBand {
                min_threshold,
                max_threshold,
            } => (min_threshold, max_threshold),
            GhunnaMode::DynamicThreshold { .. } => {
                bail!("--min-variance/--max-variance need the fixed-band profile")
            }
        };
        builder = builder.variance_band(
            args.min_variance.unwrap_or(default_min),
            args.max_variance.unwrap_or(default_max),
        );
    }

    Ok(builder.build()?)
}
