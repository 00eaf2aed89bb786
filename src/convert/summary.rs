// Mean / extrema / standard deviation over a series.

/// Statistics of a non-empty series.
///
/// `std` is the sample standard deviation (divides by `count - 1`); a single
/// value has a deviation of 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Summary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
    pub count: usize,
}

impl Summary {
    /// Returns None for an empty series.
    pub(crate) fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let std = if count > 1 {
            let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        Some(Self {
            mean,
            min,
            max,
            std,
            count,
        })
    }
}
