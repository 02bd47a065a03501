// =============================================================================
// market-eda — exploratory analysis of stock prices and news headlines
// =============================================================================
//
// The price side loads a daily OHLCV table, derives technical indicators
// (SMA, EMA, RSI, MACD) and return metrics (daily returns, annualised rolling
// volatility, cumulative returns).  The headline side computes descriptive
// statistics, publisher and timeline profiles, keywords and LDA topics.
// =============================================================================

pub mod config;
pub mod error;
pub mod headlines;
pub mod indicators;
pub mod market_data;
pub mod metrics;
pub mod nlp;
pub mod pipeline;
pub mod report;
pub mod timestamps;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use market_data::{Column, PriceTable};
pub use pipeline::MarketDataProcessor;
