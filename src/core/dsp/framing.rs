//! Frame/hop conversion and lazy overlapping frame iteration

use serde::Serialize;

use crate::error::ConfigurationError;

/// Frame geometry in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameParams {
    pub frame_length: usize,
    pub hop_length: usize,
}

impl FrameParams {
    /// Convert millisecond frame/hop sizes to sample counts at `sample_rate`.
    ///
    /// Both sizes are rounded to the nearest sample. A size that rounds to
    /// zero samples is rejected, since it cannot produce a frame.
    pub fn from_millis(
        sample_rate: u32,
        frame_ms: f64,
        hop_ms: f64,
    ) -> Result<Self, ConfigurationError> {
        let frame_length = millis_to_samples(frame_ms, sample_rate);
        let hop_length = millis_to_samples(hop_ms, sample_rate);

        if frame_length == 0 {
            return Err(ConfigurationError::ZeroLengthFrame {
                field: "frame_ms",
                sample_rate,
            });
        }
        if hop_length == 0 {
            return Err(ConfigurationError::ZeroLengthFrame {
                field: "hop_ms",
                sample_rate,
            });
        }

        Ok(Self {
            frame_length,
            hop_length,
        })
    }
}

/// `round(ms / 1000 * sample_rate)`
pub fn millis_to_samples(ms: f64, sample_rate: u32) -> usize {
    let samples = (ms / 1000.0 * sample_rate as f64).round();
    if samples.is_finite() && samples > 0.0 {
        samples as usize
    } else {
        0
    }
}

/// Number of full frames: `floor((len - frame_length) / hop_length)`,
/// or zero when the signal is shorter than one frame.
pub fn frame_count(len: usize, frame_length: usize, hop_length: usize) -> usize {
    if frame_length == 0 || hop_length == 0 || len < frame_length {
        return 0;
    }
    (len - frame_length) / hop_length
}

/// Lazily yield fixed-length, possibly overlapping windows over `samples`.
/// Trailing partial windows are dropped, never padded.
pub fn frames(
    samples: &[f32],
    frame_length: usize,
    hop_length: usize,
) -> impl Iterator<Item = &[f32]> + '_ {
    let count = frame_count(samples.len(), frame_length, hop_length);
    (0..count).map(move |k| {
        let start = k * hop_length;
        &samples[start..start + frame_length]
    })
}
