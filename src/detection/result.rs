//! Detection result types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ProfilePreset;
use crate::core::dsp::FrameParams;

/// Outcome of the Madd (elongation) detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaddResult {
    pub detected: bool,
    /// Seconds between consecutive energy peaks
    pub durations: Vec<f64>,
    /// Frame indices of the energy peaks, strictly increasing
    pub peaks: Vec<usize>,
    /// Minimum peak height (mean energy times the height multiplier)
    pub threshold_height: f64,
    /// Short-term energy per frame
    #[serde(skip)]
    pub energy: Vec<f64>,
    pub frame_params: FrameParams,
}

impl MaddResult {
    /// Longest inter-peak duration, if any
    pub fn longest_duration(&self) -> Option<f64> {
        self.durations.iter().copied().reduce(f64::max)
    }
}

/// Outcome of the Ghunna (nasalization) detector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GhunnaResult {
    pub detected: bool,
    /// Pooled population variance of cepstral coefficients 1 and 2
    pub variance: f64,
    /// `(low, high)` decision thresholds; both ends equal the proportional
    /// threshold under the dynamic profile
    pub threshold_band: (f64, f64),
    /// Decision mode that produced `detected`
    pub mode: &'static str,
    /// Number of cepstral frames the variance was taken over
    pub frames: usize,
}

/// Combined report for one recording
#[derive(Debug, Clone, Serialize)]
pub struct RecitationReport {
    pub source: String,
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub profile: ProfilePreset,
    pub madd: MaddResult,
    pub ghunna: GhunnaResult,
    pub analyzed_at: DateTime<Utc>,
}

impl RecitationReport {
    pub fn any_detected(&self) -> bool {
        self.madd.detected || self.ghunna.detected
    }
}
