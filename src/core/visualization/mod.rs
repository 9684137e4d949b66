//! Visualization tools for recitation analysis
//!
//! Renders mel spectrograms so elongated vowels and nasal segments can be
//! checked by eye.

mod spectrogram;

pub use spectrogram::{mel_spectrogram_db, render_mel_spectrogram, Colormap, SpectrogramConfig};
