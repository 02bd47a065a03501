// =============================================================================
// market-eda — Main Entry Point
// =============================================================================
//
// One batch run: load prices, apply indicators, compute metrics, export the
// enriched table, optionally analyse headlines, and write the run report.
// Any error aborts the run; nothing is retried.
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use market_eda::config::AnalysisConfig;
use market_eda::headlines::load_headlines;
use market_eda::market_data::write_table;
use market_eda::pipeline::MarketDataProcessor;
use market_eda::report::{AnalysisReport, HeadlineSummary, PriceSummary};

fn main() -> Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::var("MARKET_EDA_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("analysis_config.json"));

    let mut config = AnalysisConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AnalysisConfig::default()
    });
    config.apply_env_overrides();
    config.validate().context("invalid analysis config")?;

    info!(
        prices = %config.prices_path.display(),
        headlines = ?config.headlines_path,
        output = %config.output_path.display(),
        "Starting analysis run"
    );

    // ── 2. Price pipeline ────────────────────────────────────────────────
    info!("Loading data...");
    let mut processor = MarketDataProcessor::load(&config.prices_path)
        .with_context(|| format!("failed to load {}", config.prices_path.display()))?;

    info!("Applying technical indicators...");
    processor.apply_indicators(&config.indicators)?;

    info!("Calculating financial metrics...");
    processor.calculate_metrics(&config.metrics)?;

    write_table(processor.table(), &config.output_path)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;

    let prices = PriceSummary::build(
        &config.prices_path,
        processor.table(),
        config.indicators.rsi_window,
    )?;
    if let Some(zone) = prices.rsi_zone {
        info!(zone = %zone, "Latest RSI reading");
    }

    // ── 3. Headline analysis (optional) ──────────────────────────────────
    let headlines = match &config.headlines_path {
        Some(path) => {
            info!("Analysing headlines...");
            let rows = load_headlines(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            Some(HeadlineSummary::build(path, &rows, &config.headlines)?)
        }
        None => {
            info!("No headline file configured, skipping headline analysis");
            None
        }
    };

    // ── 4. Report ────────────────────────────────────────────────────────
    let report_path = config.report_path.clone();
    let report = AnalysisReport::new(config, prices, headlines);
    report
        .save(&report_path)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    info!(run_id = %report.run_id, "Analysis completed successfully");
    Ok(())
}
