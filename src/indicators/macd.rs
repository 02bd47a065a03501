// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line = EMA(fast) - EMA(slow)
//   Signal    = EMA(signal) of the MACD line
//   Histogram = MACD line - Signal
//
// With the classic 12/26/9 parameters the MACD line is first defined at index
// 25 and the signal/histogram at index 33.
// =============================================================================

use super::ema::ema_series;

/// The three aligned MACD outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

impl MacdSeries {
    fn undefined(len: usize) -> Self {
        Self {
            macd: vec![None; len],
            signal: vec![None; len],
            histogram: vec![None; len],
        }
    }
}

/// Compute MACD over `closes`.
///
/// Degenerate parameters (any zero window, or `fast >= slow`) produce an
/// all-undefined result rather than an error.
pub fn calculate_macd(
    closes: &[Option<f64>],
    fast: usize,
    slow: usize,
    signal: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal == 0 || fast >= slow {
        return MacdSeries::undefined(closes.len());
    }

    let fast_ema = ema_series(closes, fast);
    let slow_ema = ema_series(closes, slow);

    let macd: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal_line = ema_series(&macd, signal);

    let histogram = macd
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdSeries {
        macd,
        signal: signal_line,
        histogram,
    }
}
