// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators derived from the
// close-price series.  Each indicator has a compact kernel over `&[f64]` that
// returns only the defined values, plus a `*_series` wrapper that realigns the
// output 1:1 with the table rows, using `None` for the warm-up records.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::{calculate_ema, ema_series};
pub use macd::{calculate_macd, MacdSeries};
pub use rsi::{calculate_rsi, rsi_series, RsiZone};
pub use sma::{calculate_sma, sma_series};

/// Split off the first contiguous run of defined values.
///
/// Returns the row index where the run starts together with its values.  A
/// series with no defined values yields `(values.len(), [])`.
pub(crate) fn leading_run(values: &[Option<f64>]) -> (usize, Vec<f64>) {
    let start = values
        .iter()
        .position(Option::is_some)
        .unwrap_or(values.len());
    let run = values[start..].iter().map_while(|v| *v).collect();
    (start, run)
}

/// Place a compact indicator output back onto `len` rows, starting at
/// `offset`.  Rows outside the compact range are `None`.
pub(crate) fn align(len: usize, offset: usize, compact: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; len];
    for (slot, &v) in out.iter_mut().skip(offset).zip(compact) {
        *slot = Some(v);
    }
    out
}
