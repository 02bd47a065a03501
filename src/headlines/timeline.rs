// =============================================================================
// Publication timeline
// =============================================================================
//
// Daily frequency, spike detection, and hour-of-day / day-of-week profiles.
// Headlines without a parsed date are excluded from every view here.
//
// Spike rule:  count_d > mean(counts) + threshold * stdev(counts)
// using the sample standard deviation over the days that have articles.
// =============================================================================

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::trace;

use super::Headline;

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A day whose article count stands out from the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationSpike {
    pub date: NaiveDate,
    pub count: usize,
}

/// Number of articles per calendar day, in date order.
pub fn publication_frequency(headlines: &[Headline]) -> BTreeMap<NaiveDate, usize> {
    let mut freq = BTreeMap::new();
    for dt in headlines.iter().filter_map(|h| h.published_at) {
        *freq.entry(dt.date()).or_insert(0) += 1;
    }
    freq
}

/// Days whose count exceeds `mean + threshold * std` of the daily counts.
///
/// Fewer than two days gives no spikes (the deviation is undefined).
pub fn detect_spikes(
    frequency: &BTreeMap<NaiveDate, usize>,
    threshold: f64,
) -> Vec<PublicationSpike> {
    if frequency.len() < 2 {
        trace!(days = frequency.len(), "spike detection: insufficient days");
        return Vec::new();
    }
    let counts: Vec<f64> = frequency.values().map(|&c| c as f64).collect();
    let mean = counts.iter().mean();
    let std = counts.iter().std_dev();
    let cutoff = mean + threshold * std;

    frequency
        .iter()
        .filter(|(_, count)| **count as f64 > cutoff)
        .map(|(&date, &count)| PublicationSpike { date, count })
        .collect()
}

/// Articles per hour of day, for the hours that occur, ascending.
pub fn hourly_distribution(headlines: &[Headline]) -> BTreeMap<u32, usize> {
    let mut hours = BTreeMap::new();
    for dt in headlines.iter().filter_map(|h| h.published_at) {
        *hours.entry(dt.hour()).or_insert(0) += 1;
    }
    hours
}

/// Articles per weekday, Monday through Sunday, zero for absent days.
pub fn weekday_distribution(headlines: &[Headline]) -> Vec<(Weekday, usize)> {
    let mut counts = [0usize; 7];
    for dt in headlines.iter().filter_map(|h| h.published_at) {
        counts[dt.weekday().num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS.into_iter().zip(counts).collect()
}
