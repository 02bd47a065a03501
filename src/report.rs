// =============================================================================
// Run Report — provenance and headline figures of one analysis run
// =============================================================================
//
// Each run gets a fresh id and records the SHA-256 of its input file, so a
// report can always be traced back to the exact data it was computed from.
// The report is written with the same tmp + rename pattern as the config.
// =============================================================================

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::config::{AnalysisConfig, HeadlineParams};
use crate::error::Result;
use crate::headlines::descriptive::{headline_length_stats, DescriptiveStats};
use crate::headlines::publishers::{email_domain_counts, headlines_by_publisher, top_publishers};
use crate::headlines::timeline::{
    detect_spikes, hourly_distribution, publication_frequency, weekday_distribution,
    PublicationSpike,
};
use crate::headlines::Headline;
use crate::indicators::RsiZone;
use crate::market_data::PriceTable;
use crate::nlp::{extract_keywords, preprocess, topic_model, Keyword, LdaConfig, Topic};
use crate::pipeline::rsi_column;

/// Lower-case hex SHA-256 of the file at `path`.
pub fn file_sha256(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

// =============================================================================
// Price summary
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSummary {
    pub source: PathBuf,
    pub sha256: String,
    pub rows: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Most recent defined value of every column.
    pub latest: BTreeMap<String, f64>,
    pub rsi_zone: Option<RsiZone>,
}

impl PriceSummary {
    pub fn build(source: &Path, table: &PriceTable, rsi_window: usize) -> Result<Self> {
        let latest = table
            .columns()
            .iter()
            .filter_map(|c| c.last_defined().map(|v| (c.name.clone(), v)))
            .collect();
        let rsi_zone = table
            .column(&rsi_column(rsi_window))
            .and_then(|c| c.last_defined())
            .map(RsiZone::classify);

        Ok(Self {
            source: source.to_path_buf(),
            sha256: file_sha256(source)?,
            rows: table.len(),
            first_date: table.index().first().copied(),
            last_date: table.index().last().copied(),
            latest,
            rsi_zone,
        })
    }
}

// =============================================================================
// Headline summary
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineSummary {
    pub source: PathBuf,
    pub articles: usize,
    pub undated: usize,
    pub length_stats: Option<DescriptiveStats>,
    pub top_publishers: Vec<(String, usize)>,
    /// Headlines of each top publisher joined with `" | "`.
    pub publisher_headlines: BTreeMap<String, String>,
    pub email_domains: Vec<(String, usize)>,
    pub spikes: Vec<PublicationSpike>,
    pub hourly: BTreeMap<u32, usize>,
    pub weekdays: Vec<(String, usize)>,
    pub keywords: Vec<Keyword>,
    pub topics: Vec<Topic>,
}

impl HeadlineSummary {
    pub fn build(source: &Path, headlines: &[Headline], params: &HeadlineParams) -> Result<Self> {
        let cleaned = preprocess(headlines.iter().map(|h| h.headline.as_str()));
        let keywords = extract_keywords(&cleaned, params.max_keywords);

        let lda = LdaConfig::new(params.lda_topics)
            .n_iterations(params.lda_iterations)
            .seed(params.lda_seed);
        let topics = topic_model(&cleaned, &lda, params.words_per_topic)?;

        let top = top_publishers(headlines, params.top_publishers);
        let mut publisher_headlines = headlines_by_publisher(headlines);
        publisher_headlines.retain(|publisher, _| top.iter().any(|(name, _)| name == publisher));

        let frequency = publication_frequency(headlines);
        let spikes = detect_spikes(&frequency, params.spike_threshold);

        info!(
            articles = headlines.len(),
            days = frequency.len(),
            spikes = spikes.len(),
            "headline analysis complete"
        );

        Ok(Self {
            source: source.to_path_buf(),
            articles: headlines.len(),
            undated: headlines.iter().filter(|h| h.published_at.is_none()).count(),
            length_stats: headline_length_stats(headlines),
            top_publishers: top,
            publisher_headlines,
            email_domains: email_domain_counts(headlines),
            spikes,
            hourly: hourly_distribution(headlines),
            weekdays: weekday_distribution(headlines)
                .into_iter()
                .map(|(day, n)| (day.to_string(), n))
                .collect(),
            keywords,
            topics,
        })
    }
}

// =============================================================================
// AnalysisReport
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: AnalysisConfig,
    pub prices: PriceSummary,
    pub headlines: Option<HeadlineSummary>,
}

impl AnalysisReport {
    pub fn new(
        config: AnalysisConfig,
        prices: PriceSummary,
        headlines: Option<HeadlineSummary>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            config,
            prices,
            headlines,
        }
    }

    /// Write the report as pretty JSON to `path` (tmp + rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, path)?;
        info!(path = %path.display(), run_id = %self.run_id, "analysis report saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorParams;
    use crate::headlines::load_headlines_from_reader;
    use crate::pipeline::MarketDataProcessor;
    use std::io::Write;

    #[test]
    fn sha256_of_known_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        assert_eq!(
            file_sha256(file.path()).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    fn price_file(rows: usize) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for i in 0..rows {
            let date = start + chrono::Duration::days(i as i64);
            let close = 50.0 + i as f64;
            writeln!(file, "{date},{close},{close},{close},{close},10").unwrap();
        }
        file
    }

    #[test]
    fn price_summary_reports_latest_values_and_zone() {
        let file = price_file(30);
        let mut p = MarketDataProcessor::load(file.path()).unwrap();
        p.apply_indicators(&IndicatorParams::default()).unwrap();

        let summary = PriceSummary::build(file.path(), p.table(), 14).unwrap();
        assert_eq!(summary.rows, 30);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(summary.latest["Close"], 79.0);
        assert_eq!(summary.latest["RSI_14"], 100.0);
        assert_eq!(summary.rsi_zone, Some(RsiZone::Overbought));
        // MACD needs 26 rows; its signal line needs 34.
        assert!(summary.latest.contains_key("MACD"));
        assert!(!summary.latest.contains_key("MACD_Signal"));
        assert_eq!(summary.sha256.len(), 64);
    }

    #[test]
    fn headline_summary_and_round_trip() {
        let csv = "headline,publisher,date\n\
                   Apple unveils new iPhone,jane@benzinga.com,2020-06-01 09:00:00\n\
                   Oil prices slide on OPEC news,Lisa Levin,2020-06-01 10:00:00\n\
                   Apple stock hits record,Lisa Levin,2020-06-02 11:00:00\n\
                   Crude oil rebounds,Lisa Levin,not a date\n";
        let headlines = load_headlines_from_reader(csv.as_bytes()).unwrap();
        let params = HeadlineParams {
            lda_topics: 2,
            lda_iterations: 20,
            words_per_topic: 3,
            ..HeadlineParams::default()
        };
        let summary = HeadlineSummary::build(Path::new("news.csv"), &headlines, &params).unwrap();

        assert_eq!(summary.articles, 4);
        assert_eq!(summary.undated, 1);
        assert_eq!(summary.top_publishers[0], ("Lisa Levin".to_string(), 3));
        assert_eq!(
            summary.publisher_headlines["Lisa Levin"],
            "Oil prices slide on OPEC news | Apple stock hits record | Crude oil rebounds"
        );
        assert_eq!(summary.email_domains, vec![("benzinga.com".to_string(), 1)]);
        assert_eq!(summary.keywords[0].keyword, "apple");
        assert_eq!(summary.keywords[0].count, 2);
        assert_eq!(summary.topics.len(), 2);
        // 2020-06-01 was a Monday.
        assert_eq!(summary.weekdays[0], ("Mon".to_string(), 2));
        assert_eq!(summary.weekdays[1], ("Tue".to_string(), 1));

        let file = price_file(5);
        let prices = PriceSummary::build(
            file.path(),
            MarketDataProcessor::load(file.path()).unwrap().table(),
            14,
        )
        .unwrap();
        let report = AnalysisReport::new(AnalysisConfig::default(), prices, Some(summary));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        report.save(&path).unwrap();
        let loaded = AnalysisReport::load(&path).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.prices.rows, 5);
        assert_eq!(loaded.headlines.unwrap().articles, 4);
    }
}
