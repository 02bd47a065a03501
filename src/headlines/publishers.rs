// =============================================================================
// Publisher analysis
// =============================================================================
//
// Some publishers are recorded as e-mail addresses; their domain identifies
// the organisation behind them.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::descriptive::{count_articles_by_publisher, value_counts};
use super::Headline;

static EMAIL_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(.+)$").expect("email domain pattern is valid"));

/// The `top_n` publishers by article count.
pub fn top_publishers(headlines: &[Headline], top_n: usize) -> Vec<(String, usize)> {
    let mut counts = count_articles_by_publisher(headlines);
    counts.truncate(top_n);
    counts
}

/// Domain part of an e-mail style publisher name.
pub fn email_domain(publisher: &str) -> Option<&str> {
    EMAIL_DOMAIN
        .captures(publisher)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Article counts per e-mail domain, most frequent first.
///
/// Publishers that are not e-mail addresses are ignored.
pub fn email_domain_counts(headlines: &[Headline]) -> Vec<(String, usize)> {
    value_counts(
        headlines
            .iter()
            .filter_map(|h| email_domain(&h.publisher))
            .map(str::to_string),
    )
}

/// All headlines of each publisher joined with `" | "`, keyed by publisher.
pub fn headlines_by_publisher(headlines: &[Headline]) -> BTreeMap<String, String> {
    let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for h in headlines {
        grouped
            .entry(h.publisher.clone())
            .or_default()
            .push(h.headline.as_str());
    }
    grouped
        .into_iter()
        .map(|(publisher, titles)| (publisher, titles.join(" | ")))
        .collect()
}
