//! Digital Signal Processing utilities
//!
//! - `framing` - ms to sample conversion and lazy overlapping frames
//! - `fft` - centered short-time power spectra
//! - `mel` - Slaney mel scale and filterbank
//! - `stats` - mean, pooled variance, peak picking, dB conversion
//! - `windows` - analysis windows

pub mod fft;
pub mod framing;
pub mod mel;
pub mod stats;
pub mod windows;

pub use fft::StftProcessor;
pub use framing::{frame_count, frames, millis_to_samples, FrameParams};
pub use mel::{apply_filterbank, hz_to_mel, mel_filterbank, mel_to_hz};
pub use stats::{find_peaks, mean, population_variance, power_to_db};
pub use windows::{create_window, WindowType};
