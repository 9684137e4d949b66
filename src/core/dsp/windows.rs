//! Window function implementations

use std::f64::consts::PI;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// Periodic Hann (DFT-even), the usual choice for STFT analysis
    Hann,
    /// Symmetric Hann, zero at both ends
    HannSymmetric,
}

/// Create window function
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }

    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64;
            match window_type {
                WindowType::Hann => 0.5 - 0.5 * (2.0 * PI * x / n).cos(),
                WindowType::HannSymmetric => 0.5 - 0.5 * (2.0 * PI * x / (n - 1.0)).cos(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let window = create_window(4, WindowType::Hann);
        assert!((window[0]).abs() < 1e-12); // ~0 at the leading edge
        assert!((window[2] - 1.0).abs() < 1e-12); // peak at n/2
        assert!((window[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_hann() {
        let window = create_window(5, WindowType::HannSymmetric);
        assert!(window[0].abs() < 1e-12);
        assert!(window[4].abs() < 1e-12);
        assert!((window[2] - 1.0).abs() < 1e-12);
    }
}
