//! Statistical helpers and peak picking

/// Arithmetic mean, `None` for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Population variance (divides by `n`) of all values yielded by `values`,
/// pooled as a single sample.
pub fn population_variance<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
    I::IntoIter: Clone,
{
    let iter = values.into_iter();
    let (count, sum) = iter
        .clone()
        .fold((0usize, 0.0f64), |(n, s), v| (n + 1, s + v));
    if count == 0 {
        return 0.0;
    }

    let mean = sum / count as f64;
    iter.map(|v| (v - mean) * (v - mean)).sum::<f64>() / count as f64
}

/// Find interior local maxima whose height is at least `min_height`.
///
/// A point is a peak when it is strictly higher than the nearest differing
/// sample on each side. Flat plateaus report the index of their first
/// sample. The first and last samples are never peaks. Returned indices are
/// strictly increasing.
pub fn find_peaks(data: &[f64], min_height: f64) -> Vec<usize> {
    let mut peaks = Vec::new();
    if data.len() < 3 {
        return peaks;
    }

    let last = data.len() - 1;
    let mut i = 1;
    while i < last {
        if data[i - 1] < data[i] {
            let mut ahead = i + 1;
            while ahead < last && data[ahead] == data[i] {
                ahead += 1;
            }

            if data[ahead] < data[i] {
                if data[i] >= min_height {
                    peaks.push(i);
                }
                // Nothing up to `ahead` can be a maximum
                i = ahead;
            }
        }
        i += 1;
    }

    peaks
}

/// Convert power to dB: `10 * log10(max(amin, power))`
pub fn power_to_db(power: f64, amin: f64) -> f64 {
    10.0 * power.max(amin).log10()
}
