// =============================================================================
// Market Data Processor — load, indicators, metrics
// =============================================================================
//
// Owns one price table for the duration of a run and extends it stage by
// stage.  Each stage is a thin call into the stateless kernels in
// `indicators` and `metrics`; the processor only decides column names and
// windows.
// =============================================================================

use std::path::Path;

use tracing::info;

use crate::config::{IndicatorParams, MetricsParams};
use crate::error::Result;
use crate::indicators::{calculate_macd, ema_series, rsi_series, sma_series};
use crate::market_data::price_table::{PriceTable, CLOSE};
use crate::market_data::{load_prices, load_prices_from_reader};
use crate::metrics::apply_metrics;

pub const MACD: &str = "MACD";
pub const MACD_SIGNAL: &str = "MACD_Signal";
pub const MACD_HIST: &str = "MACD_Hist";

pub fn sma_column(window: usize) -> String {
    format!("SMA_{window}")
}

pub fn ema_column(window: usize) -> String {
    format!("EMA_{window}")
}

pub fn rsi_column(window: usize) -> String {
    format!("RSI_{window}")
}

#[derive(Debug, Clone)]
pub struct MarketDataProcessor {
    table: PriceTable,
}

impl MarketDataProcessor {
    /// Load and validate a price file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            table: load_prices(path)?,
        })
    }

    /// Load and validate price data from an in-memory CSV buffer.
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        Ok(Self {
            table: load_prices_from_reader(bytes)?,
        })
    }

    /// Wrap a table built elsewhere.
    pub fn from_table(table: PriceTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn into_table(self) -> PriceTable {
        self.table
    }

    /// Add SMA, EMA, RSI and MACD columns derived from `Close`.
    pub fn apply_indicators(&mut self, params: &IndicatorParams) -> Result<&PriceTable> {
        let closes = self.table.require(CLOSE)?;

        let sma = sma_series(closes, params.sma_window);
        let ema = ema_series(closes, params.ema_window);
        let rsi = rsi_series(closes, params.rsi_window);
        let macd = calculate_macd(
            closes,
            params.macd_fast,
            params.macd_slow,
            params.macd_signal,
        );

        self.table.insert_column(&sma_column(params.sma_window), sma)?;
        self.table.insert_column(&ema_column(params.ema_window), ema)?;
        self.table.insert_column(&rsi_column(params.rsi_window), rsi)?;
        self.table.insert_column(MACD, macd.macd)?;
        self.table.insert_column(MACD_SIGNAL, macd.signal)?;
        self.table.insert_column(MACD_HIST, macd.histogram)?;

        info!(rows = self.table.len(), "technical indicators applied");
        Ok(&self.table)
    }

    /// Add daily returns, rolling volatility and cumulative returns.
    pub fn calculate_metrics(&mut self, params: &MetricsParams) -> Result<&PriceTable> {
        apply_metrics(&mut self.table, params.volatility_window, params.trading_days)?;
        info!(rows = self.table.len(), "financial metrics calculated");
        Ok(&self.table)
    }
}
