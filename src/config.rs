// =============================================================================
// Analysis Configuration — file-backed settings with atomic save
// =============================================================================
//
// Every tunable of a run lives here: input/output paths, indicator windows,
// metric parameters and headline-analysis knobs.  All fields carry
// `#[serde(default)]` so a partial (or empty) JSON file still loads.
//
// Persistence uses an atomic tmp + rename pattern.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_prices_path() -> PathBuf {
    PathBuf::from("data/stock_prices.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("outputs/price_analysis.csv")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("outputs/analysis_report.json")
}

fn default_sma_window() -> usize {
    20
}

fn default_ema_window() -> usize {
    20
}

fn default_rsi_window() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_volatility_window() -> usize {
    20
}

fn default_trading_days() -> f64 {
    252.0
}

fn default_top_publishers() -> usize {
    10
}

fn default_max_keywords() -> usize {
    20
}

fn default_spike_threshold() -> f64 {
    2.0
}

fn default_lda_topics() -> usize {
    5
}

fn default_words_per_topic() -> usize {
    10
}

fn default_lda_iterations() -> usize {
    200
}

fn default_lda_seed() -> u64 {
    42
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Look-back windows for the close-price indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_window")]
    pub sma_window: usize,

    #[serde(default = "default_ema_window")]
    pub ema_window: usize,

    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_window: default_sma_window(),
            ema_window: default_ema_window(),
            rsi_window: default_rsi_window(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

// =============================================================================
// MetricsParams
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsParams {
    /// Trailing window of the rolling volatility.
    #[serde(default = "default_volatility_window")]
    pub volatility_window: usize,

    /// Trading days per year used to annualise volatility.
    #[serde(default = "default_trading_days")]
    pub trading_days: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            volatility_window: default_volatility_window(),
            trading_days: default_trading_days(),
        }
    }
}

// =============================================================================
// HeadlineParams
// =============================================================================

/// Knobs for the headline EDA and topic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineParams {
    #[serde(default = "default_top_publishers")]
    pub top_publishers: usize,

    /// Number of keywords kept by the count vectorizer.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// A day is a publication spike when its count exceeds
    /// mean + threshold * std.
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold: f64,

    #[serde(default = "default_lda_topics")]
    pub lda_topics: usize,

    #[serde(default = "default_words_per_topic")]
    pub words_per_topic: usize,

    /// Gibbs sampling sweeps over the corpus.
    #[serde(default = "default_lda_iterations")]
    pub lda_iterations: usize,

    #[serde(default = "default_lda_seed")]
    pub lda_seed: u64,
}

impl Default for HeadlineParams {
    fn default() -> Self {
        Self {
            top_publishers: default_top_publishers(),
            max_keywords: default_max_keywords(),
            spike_threshold: default_spike_threshold(),
            lda_topics: default_lda_topics(),
            words_per_topic: default_words_per_topic(),
            lda_iterations: default_lda_iterations(),
            lda_seed: default_lda_seed(),
        }
    }
}

// =============================================================================
// AnalysisConfig
// =============================================================================

/// Top-level configuration of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    // --- Paths ---------------------------------------------------------------

    /// Daily OHLCV price file.
    #[serde(default = "default_prices_path")]
    pub prices_path: PathBuf,

    /// Optional news headline file; headline analysis is skipped without it.
    #[serde(default)]
    pub headlines_path: Option<PathBuf>,

    /// Destination of the enriched price table.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Destination of the JSON run report.
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,

    // --- Parameters ----------------------------------------------------------

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub metrics: MetricsParams,

    #[serde(default)]
    pub headlines: HeadlineParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prices_path: default_prices_path(),
            headlines_path: None,
            output_path: default_output_path(),
            report_path: default_report_path(),
            indicators: IndicatorParams::default(),
            metrics: MetricsParams::default(),
            headlines: HeadlineParams::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// A missing file is an error so the caller can fall back to defaults
    /// with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse analysis config from {}", path.display()))?;

        info!(
            path = %path.display(),
            prices = %config.prices_path.display(),
            "analysis config loaded"
        );

        Ok(config)
    }

    /// Persist the configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise analysis config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "analysis config saved (atomic)");
        Ok(())
    }

    /// Apply `MARKET_EDA_*` environment overrides for the paths.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("MARKET_EDA_PRICES") {
            self.prices_path = PathBuf::from(v);
        }
        if let Some(v) = get("MARKET_EDA_HEADLINES") {
            self.headlines_path = Some(PathBuf::from(v));
        }
        if let Some(v) = get("MARKET_EDA_OUTPUT") {
            self.output_path = PathBuf::from(v);
        }
        if let Some(v) = get("MARKET_EDA_REPORT") {
            self.report_path = PathBuf::from(v);
        }
    }

    /// Reject parameter combinations no stage can work with.
    pub fn validate(&self) -> Result<()> {
        let ind = &self.indicators;
        for (name, window) in [
            ("sma_window", ind.sma_window),
            ("ema_window", ind.ema_window),
            ("macd_fast", ind.macd_fast),
            ("macd_slow", ind.macd_slow),
            ("macd_signal", ind.macd_signal),
        ] {
            if window == 0 {
                bail!("indicators.{name} must be positive");
            }
        }
        if ind.rsi_window < 2 {
            bail!("indicators.rsi_window must be at least 2");
        }
        if ind.macd_fast >= ind.macd_slow {
            bail!(
                "indicators.macd_fast ({}) must be below macd_slow ({})",
                ind.macd_fast,
                ind.macd_slow
            );
        }
        if self.metrics.volatility_window < 2 {
            bail!("metrics.volatility_window must be at least 2");
        }
        if !(self.metrics.trading_days > 0.0) {
            bail!("metrics.trading_days must be positive");
        }
        if self.headlines.lda_topics == 0 {
            bail!("headlines.lda_topics must be positive");
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.prices_path, PathBuf::from("data/stock_prices.csv"));
        assert!(cfg.headlines_path.is_none());
        assert_eq!(cfg.indicators.sma_window, 20);
        assert_eq!(cfg.indicators.ema_window, 20);
        assert_eq!(cfg.indicators.rsi_window, 14);
        assert_eq!(
            (cfg.indicators.macd_fast, cfg.indicators.macd_slow, cfg.indicators.macd_signal),
            (12, 26, 9)
        );
        assert_eq!(cfg.metrics.volatility_window, 20);
        assert!((cfg.metrics.trading_days - 252.0).abs() < f64::EPSILON);
        assert_eq!(cfg.headlines.lda_seed, 42);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.indicators.rsi_window, 14);
        assert_eq!(cfg.headlines.max_keywords, 20);
        assert_eq!(cfg.output_path, PathBuf::from("outputs/price_analysis.csv"));
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "prices_path": "aapl.csv", "indicators": { "rsi_window": 9 } }"#;
        let cfg: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.prices_path, PathBuf::from("aapl.csv"));
        assert_eq!(cfg.indicators.rsi_window, 9);
        assert_eq!(cfg.indicators.sma_window, 20);
        assert_eq!(cfg.metrics.volatility_window, 20);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis_config.json");
        let mut cfg = AnalysisConfig::default();
        cfg.headlines_path = Some(PathBuf::from("data/raw_analyst_ratings.csv"));
        cfg.save(&path).unwrap();

        let loaded = AnalysisConfig::load(&path).unwrap();
        assert_eq!(loaded.headlines_path, cfg.headlines_path);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(AnalysisConfig::load("/definitely/not/here.json").is_err());
    }

    #[test]
    fn overrides_replace_paths() {
        let env: HashMap<&str, &str> = [
            ("MARKET_EDA_PRICES", "msft.csv"),
            ("MARKET_EDA_HEADLINES", "news.csv"),
            ("MARKET_EDA_OUTPUT", "  "),
        ]
        .into_iter()
        .collect();
        let mut cfg = AnalysisConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.prices_path, PathBuf::from("msft.csv"));
        assert_eq!(cfg.headlines_path, Some(PathBuf::from("news.csv")));
        // Blank values are ignored.
        assert_eq!(cfg.output_path, default_output_path());
    }

    #[test]
    fn validate_rejects_bad_windows() {
        let mut cfg = AnalysisConfig::default();
        cfg.indicators.macd_fast = 30;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.indicators.sma_window = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.metrics.volatility_window = 1;
        assert!(cfg.validate().is_err());
    }
}
