// =============================================================================
// Descriptive statistics over headlines
// =============================================================================

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min};

use super::Headline;

/// Summary of a numeric sample.
///
/// Quartiles interpolate linearly between the two nearest ranks (position
/// `(n - 1) * p` of the sorted sample); `std` is the sample standard
/// deviation and is `None` below two observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Describe `values`.  Returns `None` for an empty sample.
    pub fn describe(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let data = Data::new(values.to_vec());
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: values.len(),
            mean: data.mean()?,
            std: data.std_dev().filter(|s| s.is_finite()),
            min: data.min(),
            lower_quartile: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            upper_quartile: quantile_sorted(&sorted, 0.75),
            max: data.max(),
        })
    }
}

/// Linearly interpolated `p`-quantile of a non-empty ascending sample.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Character length of each headline.
pub fn headline_lengths(headlines: &[Headline]) -> Vec<usize> {
    headlines
        .iter()
        .map(|h| h.headline.chars().count())
        .collect()
}

/// Descriptive statistics of headline length.
pub fn headline_length_stats(headlines: &[Headline]) -> Option<DescriptiveStats> {
    let lengths: Vec<f64> = headline_lengths(headlines)
        .into_iter()
        .map(|l| l as f64)
        .collect();
    DescriptiveStats::describe(&lengths)
}

/// Count occurrences, most frequent first; ties are ordered by key.
pub fn value_counts<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Ord,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut counts: Vec<(K, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Number of articles per publisher, most prolific first.
pub fn count_articles_by_publisher(headlines: &[Headline]) -> Vec<(String, usize)> {
    value_counts(headlines.iter().map(|h| h.publisher.clone()))
}
