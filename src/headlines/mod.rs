// =============================================================================
// News Headlines — loading and exploratory analysis
// =============================================================================
//
// Headlines come from a CSV with at least `headline`, `publisher` and `date`
// columns.  Dates are parsed leniently; a value that does not parse becomes
// `None` and the record is kept (it simply drops out of date-based views).

pub mod descriptive;
pub mod publishers;
pub mod timeline;

use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::timestamps::parse_datetime;

pub const HEADLINE: &str = "headline";
pub const PUBLISHER: &str = "publisher";
pub const DATE: &str = "date";

/// Required header columns, in validation order.
pub const REQUIRED_COLUMNS: [&str; 3] = [HEADLINE, PUBLISHER, DATE];

/// A single news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub headline: String,
    pub publisher: String,
    pub published_at: Option<NaiveDateTime>,
    pub url: Option<String>,
    pub stock: Option<String>,
}

/// Load headlines from `path`.
pub fn load_headlines(path: impl AsRef<Path>) -> Result<Vec<Headline>> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headlines = read_headlines(rdr)?;
    info!(path = %path.display(), rows = headlines.len(), "headlines loaded");
    Ok(headlines)
}

/// Load headlines from any reader.
pub fn load_headlines_from_reader<R: Read>(reader: R) -> Result<Vec<Headline>> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    read_headlines(rdr)
}

fn read_headlines<R: Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Headline>> {
    let headers = rdr.headers()?.clone();
    let find = |name: &str| headers.iter().position(|h| h.trim() == name);

    let mut required = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in required.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = find(name).ok_or_else(|| AnalysisError::Schema {
            column: name.to_string(),
        })?;
    }
    let [headline_idx, publisher_idx, date_idx] = required;
    let url_idx = find("url");
    let stock_idx = find("stock");

    let optional = |record: &StringRecord, idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut headlines = Vec::new();
    let mut unparsed_dates = 0usize;
    for result in rdr.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let published_at = parse_datetime(field(date_idx));
        if published_at.is_none() {
            unparsed_dates += 1;
        }

        headlines.push(Headline {
            headline: field(headline_idx).to_string(),
            publisher: field(publisher_idx).trim().to_string(),
            published_at,
            url: optional(&record, url_idx),
            stock: optional(&record, stock_idx),
        });
    }

    if unparsed_dates > 0 {
        warn!(count = unparsed_dates, "headline dates could not be parsed");
    }
    Ok(headlines)
}
