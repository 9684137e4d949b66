//! Configuration module for tajweedcheck

mod profiles;

pub use profiles::{
    default_config_path, ConfigBuilder, DetectionConfig, GhunnaConfig, GhunnaMode, MaddConfig,
    ProfilePreset,
};
