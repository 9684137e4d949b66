//! Short-time power spectra over a full signal

use std::sync::Arc;

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};

use super::windows::{create_window, WindowType};
use crate::error::TransformError;

/// Centered short-time Fourier transform producing power spectra.
///
/// The signal is padded with `n_fft / 2` zeros on both sides so that frame
/// `t` is centered on sample `t * hop_length`. A signal of `n` samples
/// yields `1 + n / hop_length` frames.
pub struct StftProcessor {
    fft: Arc<dyn RealToComplex<f64>>,
    window: Vec<f64>,
    n_fft: usize,
    hop_length: usize,
}

impl StftProcessor {
    pub fn new(n_fft: usize, hop_length: usize, window_type: WindowType) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        Self {
            fft: planner.plan_fft_forward(n_fft),
            window: create_window(n_fft, window_type),
            n_fft,
            hop_length,
        }
    }

    /// Number of centered frames for a signal of `len` samples
    pub fn frame_count(&self, len: usize) -> usize {
        if self.hop_length == 0 {
            return 0;
        }
        1 + len / self.hop_length
    }

    /// Power spectrogram laid out as `frames x bins`
    pub fn power_spectrogram(&self, samples: &[f32]) -> Result<Vec<Vec<f64>>, TransformError> {
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(TransformError::NonFiniteInput);
        }

        let num_frames = self.frame_count(samples.len());
        if num_frames == 0 {
            return Err(TransformError::NoFrames);
        }

        let pad = self.n_fft / 2;
        let mut input = self.fft.make_input_vec();
        let mut spectrum: Vec<Complex<f64>> = self.fft.make_output_vec();
        let mut frames = Vec::with_capacity(num_frames);

        for t in 0..num_frames {
            // Index into the virtual zero-padded signal
            let origin = (t * self.hop_length) as isize - pad as isize;
            for (i, slot) in input.iter_mut().enumerate() {
                let idx = origin + i as isize;
                let sample = if idx >= 0 && (idx as usize) < samples.len() {
                    samples[idx as usize] as f64
                } else {
                    0.0
                };
                *slot = sample * self.window[i];
            }

            self.fft
                .process(&mut input, &mut spectrum)
                .map_err(|e| TransformError::Fft(e.to_string()))?;

            frames.push(spectrum.iter().map(|c| c.norm_sqr()).collect());
        }

        Ok(frames)
    }
}
