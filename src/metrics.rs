// =============================================================================
// Return / Volatility Metrics
// =============================================================================
//
//   Returns_t            = (close_t - close_{t-1}) / close_{t-1}
//   Volatility_t         = stdev(Returns over trailing window) * sqrt(days)
//   Cumulative_Returns_t = prod_{k <= t} (1 + Returns_k)
//
// The standard deviation is the sample (n - 1) estimator.  A return is
// undefined at t = 0, wherever either close is undefined, and where the
// previous close is zero.  The cumulative product skips undefined returns
// and carries the running value across them.
// =============================================================================

use statrs::statistics::Statistics;
use tracing::debug;

use crate::error::Result;
use crate::market_data::price_table::{PriceTable, CLOSE};

pub const RETURNS: &str = "Returns";
pub const CUMULATIVE_RETURNS: &str = "Cumulative_Returns";

/// Column name of the rolling volatility for `window`.
pub fn volatility_column(window: usize) -> String {
    format!("Volatility_{window}")
}

/// Simple close-to-close returns.
pub fn daily_returns(closes: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(closes.len());
    if closes.is_empty() {
        return out;
    }
    out.push(None);
    for w in closes.windows(2) {
        out.push(match (w[0], w[1]) {
            (Some(prev), Some(cur)) if prev != 0.0 => Some((cur - prev) / prev),
            _ => None,
        });
    }
    out
}

/// Annualised rolling standard deviation of `returns`.
///
/// A row is defined only when every return in its trailing `window` is
/// defined.  `window < 2` leaves every row undefined.
pub fn rolling_volatility(
    returns: &[Option<f64>],
    window: usize,
    trading_days: f64,
) -> Vec<Option<f64>> {
    let mut out = vec![None; returns.len()];
    if window < 2 || returns.len() < window {
        return out;
    }

    let scale = trading_days.sqrt();
    for (end, slot) in out.iter_mut().enumerate().skip(window - 1) {
        let slice = &returns[end + 1 - window..=end];
        let values: Option<Vec<f64>> = slice.iter().copied().collect();
        if let Some(values) = values {
            let sd = values.std_dev();
            if sd.is_finite() {
                *slot = Some(sd * scale);
            }
        }
    }
    out
}

/// Growth of one unit invested at the start of the series.
pub fn cumulative_returns(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut running: Option<f64> = None;
    returns
        .iter()
        .map(|r| {
            let r = (*r)?;
            let next = running.unwrap_or(1.0) * (1.0 + r);
            running = Some(next);
            Some(next)
        })
        .collect()
}

/// Add `Returns`, `Volatility_{window}` and `Cumulative_Returns` to `table`.
///
/// Fails with `MissingColumn` when `Close` is absent, which can happen for
/// tables assembled outside the loader.
pub fn apply_metrics(table: &mut PriceTable, window: usize, trading_days: f64) -> Result<()> {
    let closes = table.require(CLOSE)?;

    let returns = daily_returns(closes);
    let volatility = rolling_volatility(&returns, window, trading_days);
    let cumulative = cumulative_returns(&returns);

    debug!(
        rows = table.len(),
        window,
        defined_volatility = volatility.iter().flatten().count(),
        "return metrics computed"
    );

    table.insert_column(RETURNS, returns)?;
    table.insert_column(&volatility_column(window), volatility)?;
    table.insert_column(CUMULATIVE_RETURNS, cumulative)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::market_data::price_table::Column;
    use chrono::NaiveDate;

    fn wrap(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn returns_known_values() {
        let r = daily_returns(&wrap(&[100.0, 110.0, 99.0]));
        assert_eq!(r[0], None);
        assert!((r[1].unwrap() - 0.1).abs() < 1e-12);
        assert!((r[2].unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn returns_undefined_after_zero_close() {
        let r = daily_returns(&wrap(&[0.0, 5.0, 6.0]));
        assert_eq!(r[1], None);
        assert!(r[2].is_some());
    }

    #[test]
    fn returns_empty_input() {
        assert!(daily_returns(&[]).is_empty());
    }

    #[test]
    fn volatility_matches_sample_std() {
        let returns = vec![None, Some(0.01), Some(-0.02), Some(0.03)];
        let vol = rolling_volatility(&returns, 3, 252.0);
        assert!(vol[..3].iter().all(Option::is_none));
        let mean = (0.01 - 0.02 + 0.03) / 3.0;
        let var = [0.01_f64, -0.02, 0.03]
            .iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / 2.0;
        let expected = var.sqrt() * 252.0_f64.sqrt();
        assert!((vol[3].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn volatility_window_too_small() {
        let returns = wrap(&[0.1, 0.2, 0.3]);
        assert!(rolling_volatility(&returns, 1, 252.0).iter().all(Option::is_none));
    }

    #[test]
    fn cumulative_satisfies_recurrence() {
        let closes: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.9).cos() * 7.0).collect();
        let returns = daily_returns(&wrap(&closes));
        let cumulative = cumulative_returns(&returns);

        assert_eq!(cumulative[0], None);
        assert!((cumulative[1].unwrap() - (1.0 + returns[1].unwrap())).abs() < 1e-12);
        for t in 2..50 {
            let expected = cumulative[t - 1].unwrap() * (1.0 + returns[t].unwrap());
            assert!((cumulative[t].unwrap() - expected).abs() < 1e-12);
        }
        // Growth of one unit tracks the price ratio.
        assert!((cumulative[49].unwrap() - closes[49] / closes[0]).abs() < 1e-9);
    }

    #[test]
    fn cumulative_carries_across_gaps() {
        let c = cumulative_returns(&[None, Some(0.1), None, Some(0.1)]);
        assert_eq!(c[0], None);
        assert_eq!(c[2], None);
        assert!((c[3].unwrap() - 1.21).abs() < 1e-12);
    }

    #[test]
    fn constant_close_gives_zero_returns_and_volatility() {
        let mut table = PriceTable::from_columns(
            (1..=30)
                .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
                .collect(),
            vec![Column {
                name: CLOSE.into(),
                values: vec![Some(42.0); 30],
            }],
        )
        .unwrap();
        apply_metrics(&mut table, 20, 252.0).unwrap();

        let returns = table.values(RETURNS).unwrap();
        assert_eq!(returns[0], None);
        assert!(returns[1..].iter().all(|r| *r == Some(0.0)));

        let vol = table.values("Volatility_20").unwrap();
        assert!(vol[..20].iter().all(Option::is_none));
        assert!(vol[20..].iter().all(|v| *v == Some(0.0)));

        let cumulative = table.values(CUMULATIVE_RETURNS).unwrap();
        assert!(cumulative.iter().flatten().all(|&c| c == 1.0));
        assert_eq!(cumulative.iter().flatten().count(), 29);
    }

    #[test]
    fn missing_close_is_reported() {
        let mut table = PriceTable::from_columns(
            vec![NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()],
            vec![Column {
                name: "Open".into(),
                values: vec![Some(1.0)],
            }],
        )
        .unwrap();
        match apply_metrics(&mut table, 20, 252.0) {
            Err(AnalysisError::MissingColumn(name)) => assert_eq!(name, "Close"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
