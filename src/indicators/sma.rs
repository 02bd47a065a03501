// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (close_{t-period+1} + ... + close_t) / period
//
// Undefined for the first `period - 1` records.
// =============================================================================

use super::{align, leading_run};

/// Compute the SMA series for `values` and look-back `period`.
///
/// Each output element corresponds to an input starting at index
/// `period - 1`.  Returns an empty `Vec` when `period == 0` or the input is
/// shorter than `period`.
pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }
    let divisor = period as f64;
    values
        .windows(period)
        .map(|w| w.iter().sum::<f64>() / divisor)
        .collect()
}

/// SMA aligned with the input rows.
pub fn sma_series(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let (start, run) = leading_run(values);
    let compact = calculate_sma(&run, period);
    align(values.len(), start + period.saturating_sub(1), &compact)
}
