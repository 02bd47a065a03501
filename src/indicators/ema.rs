// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices than the SMA does.
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` values, so
// the series is undefined for the first `period - 1` records, the same as the
// SMA of the same window.
// =============================================================================

use super::{align, leading_run};

/// Compute the EMA for `values` and look-back `period`.
///
/// Each output element corresponds to an input starting at index
/// `period - 1`.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - `values.len() < period` => empty vec
/// - A non-finite intermediate value truncates the output there.
pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || values.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &value in &values[period..] {
        let ema = value * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

/// EMA aligned with the input rows.
///
/// Leading undefined values are skipped; the seed window starts at the first
/// defined value.
pub fn ema_series(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let (start, run) = leading_run(values);
    let compact = calculate_ema(&run, period);
    align(values.len(), start + period.saturating_sub(1), &compact)
}
