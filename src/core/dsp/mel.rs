//! Mel scale conversion and triangular filterbank
//!
//! Uses the Slaney auditory-toolbox mel scale: linear below 1 kHz,
//! logarithmic above. Each triangle is area-normalised so that bands of
//! different widths carry comparable energy.

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert frequency in Hz to Slaney mels
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Convert Slaney mels to frequency in Hz
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// `n` band edge frequencies evenly spaced on the mel scale between `fmin` and `fmax`
pub fn mel_frequencies(n: usize, fmin: f64, fmax: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![fmin];
    }

    let min_mel = hz_to_mel(fmin);
    let max_mel = hz_to_mel(fmax);
    (0..n)
        .map(|i| mel_to_hz(min_mel + (max_mel - min_mel) * i as f64 / (n - 1) as f64))
        .collect()
}

/// Build an `n_mels x (n_fft / 2 + 1)` filterbank matrix.
pub fn mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    fmin: f64,
    fmax: f64,
) -> Vec<Vec<f64>> {
    let n_bins = n_fft / 2 + 1;
    let bin_freqs: Vec<f64> = (0..n_bins)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();
    let edges = mel_frequencies(n_mels + 2, fmin, fmax);

    (0..n_mels)
        .map(|m| {
            let lower_span = edges[m + 1] - edges[m];
            let upper_span = edges[m + 2] - edges[m + 1];
            let enorm = 2.0 / (edges[m + 2] - edges[m]);

            bin_freqs
                .iter()
                .map(|&f| {
                    let rising = (f - edges[m]) / lower_span;
                    let falling = (edges[m + 2] - f) / upper_span;
                    rising.min(falling).max(0.0) * enorm
                })
                .collect()
        })
        .collect()
}

/// Project a power spectrum onto the filterbank
pub fn apply_filterbank(power: &[f64], filterbank: &[Vec<f64>]) -> Vec<f64> {
    filterbank
        .iter()
        .map(|weights| weights.iter().zip(power).map(|(w, p)| w * p).sum())
        .collect()
}
