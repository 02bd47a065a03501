// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute close-to-close deltas.
// Step 2 — Seed average gain / average loss with the simple mean of the
//          deltas inside the first `period` closes (`period - 1` deltas).
// Step 3 — Apply Wilder's smoothing for every later delta:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Seeding on the first `period` closes keeps RSI on the same warm-up as the
// moving averages: undefined for the first `period - 1` records.
//
// Thresholds:  RSI >= 70 => OVERBOUGHT,  RSI <= 30 => OVERSOLD.
// =============================================================================

use serde::{Deserialize, Serialize};

use super::{align, leading_run};

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

/// Compute the RSI for `closes` and `period`.
///
/// The returned vector has one value per close starting at index
/// `period - 1`.
///
/// # Edge cases
/// - `period < 2` => empty vec (no delta fits in the seed window)
/// - `closes.len() < period` => empty vec
/// - Zero average loss yields 100.0, including a perfectly flat window.
/// - Non-finite results truncate the series.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period < 2 || closes.len() < period {
        return Vec::new();
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let seed_len = period - 1;

    // --- Seed averages with the mean of the first window's deltas ----------
    let (sum_gain, sum_loss) = deltas[..seed_len]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
            if d > 0.0 {
                (g + d, l)
            } else {
                (g, l + d.abs())
            }
        });

    let mut avg_gain = sum_gain / seed_len as f64;
    let mut avg_loss = sum_loss / seed_len as f64;

    let Some(first) = rsi_from_averages(avg_gain, avg_loss) else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(first);

    // --- Wilder's smoothing for subsequent values ---------------------------
    let period_f = period as f64;
    for &delta in &deltas[seed_len..] {
        let gain = if delta > 0.0 { delta } else { 0.0 };
        let loss = if delta < 0.0 { delta.abs() } else { 0.0 };

        avg_gain = (avg_gain * (period_f - 1.0) + gain) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

/// RSI aligned with the input rows.
pub fn rsi_series(closes: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let (start, run) = leading_run(closes);
    let compact = calculate_rsi(&run, period);
    align(closes.len(), start + period.saturating_sub(1), &compact)
}

/// Overbought / oversold classification of a single RSI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiZone {
    pub fn classify(rsi: f64) -> Self {
        if rsi >= OVERBOUGHT {
            Self::Overbought
        } else if rsi <= OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for RsiZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overbought => write!(f, "OVERBOUGHT"),
            Self::Oversold => write!(f, "OVERSOLD"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_too_small() {
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 0).is_empty());
        assert!(calculate_rsi(&[1.0, 2.0, 3.0], 1).is_empty());
    }

    #[test]
    fn rsi_insufficient_data() {
        let closes: Vec<f64> = (1..=13).map(|x| x as f64).collect();
        assert!(calculate_rsi(&closes, 14).is_empty());
    }

    #[test]
    fn rsi_output_length() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        assert_eq!(calculate_rsi(&closes, 14).len(), 17);
    }

    #[test]
    fn rsi_all_gains_is_exactly_100_from_index_13() {
        let closes: Vec<Option<f64>> = (100..130).map(|x| Some(x as f64)).collect();
        let series = rsi_series(&closes, 14);
        assert_eq!(series.len(), 30);
        assert!(series[..13].iter().all(Option::is_none));
        for (i, v) in series.iter().enumerate().skip(13) {
            assert_eq!(*v, Some(100.0), "index {i}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&closes, 14);
        assert!(!series.is_empty());
        for &v in &series {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_has_no_losses() {
        let series = calculate_rsi(&[100.0; 30], 14);
        assert!(!series.is_empty());
        assert!(series.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn rsi_range_check() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 44.18, 44.22, 44.57, 43.42, 42.66, 43.13, 41.0, 47.5,
        ];
        let series = calculate_rsi(&closes, 14);
        assert_eq!(series.len(), 7);
        for &v in &series {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_seed_uses_mean_of_first_window_deltas() {
        // deltas: +2, -1 => avg_gain = 1, avg_loss = 0.5, RS = 2
        let series = calculate_rsi(&[10.0, 12.0, 11.0], 3);
        assert_eq!(series.len(), 1);
        assert!((series[0] - (100.0 - 100.0 / 3.0)).abs() < 1e-10);
    }

    #[test]
    fn rsi_wilder_smoothing_step() {
        // Seed as above, then delta +3 with period 3:
        // avg_gain = (1*2 + 3)/3 = 5/3, avg_loss = (0.5*2 + 0)/3 = 1/3, RS = 5
        let series = calculate_rsi(&[10.0, 12.0, 11.0, 14.0], 3);
        assert_eq!(series.len(), 2);
        assert!((series[1] - (100.0 - 100.0 / 6.0)).abs() < 1e-10);
    }

    #[test]
    fn zone_classification() {
        assert_eq!(RsiZone::classify(100.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(70.0), RsiZone::Overbought);
        assert_eq!(RsiZone::classify(0.0), RsiZone::Oversold);
        assert_eq!(RsiZone::classify(50.0), RsiZone::Neutral);
        assert_eq!(RsiZone::Oversold.to_string(), "OVERSOLD");
    }
}
