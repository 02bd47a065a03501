// =============================================================================
// Price Loader — CSV ingestion, schema validation, chronological ordering
// =============================================================================
//
// Reads a delimited file with a header row, checks that every required column
// is present (case-sensitive), parses each record into a `PriceBar`, and sorts
// the bars ascending by date.  The sort is stable, so rows sharing a date keep
// their source order.
// =============================================================================

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use super::price_table::{PriceBar, PriceTable, CLOSE, DATE, HIGH, LOW, OPEN, VOLUME};
use crate::error::{AnalysisError, Result};
use crate::timestamps::parse_date;

/// Required header columns, in validation order.
pub const REQUIRED_COLUMNS: [&str; 6] = [DATE, OPEN, HIGH, LOW, CLOSE, VOLUME];

/// Header positions of the required columns.
struct ColumnIndex {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| AnalysisError::Schema {
                    column: column.to_string(),
                })?;
        }
        let [date, open, high, low, close, volume] = positions;
        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Load a price file from `path` into a sorted [`PriceTable`].
pub fn load_prices(path: impl AsRef<Path>) -> Result<PriceTable> {
    let path = path.as_ref();
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let table = read_table(rdr)?;
    info!(path = %path.display(), rows = table.len(), "price data loaded");
    Ok(table)
}

/// Load price data from any reader (an in-memory buffer, stdin, ...).
pub fn load_prices_from_reader<R: Read>(reader: R) -> Result<PriceTable> {
    let rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    read_table(rdr)
}

fn read_table<R: Read>(mut rdr: csv::Reader<R>) -> Result<PriceTable> {
    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut bars = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        bars.push(parse_bar(&record, &columns, i + 1)?);
    }

    bars.sort_by_key(|b| b.date);
    debug!(
        rows = bars.len(),
        first = ?bars.first().map(|b| b.date),
        last = ?bars.last().map(|b| b.date),
        "price bars sorted"
    );

    Ok(PriceTable::from_bars(&bars))
}

fn parse_bar(record: &StringRecord, columns: &ColumnIndex, row: usize) -> Result<PriceBar> {
    let field = |idx: usize| record.get(idx).unwrap_or("");

    let raw_date = field(columns.date);
    let date = parse_date(raw_date).ok_or_else(|| AnalysisError::Parse {
        row,
        column: DATE.to_string(),
        value: raw_date.to_string(),
    })?;

    let number = |idx: usize, name: &str| -> Result<f64> {
        let raw = field(idx);
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(AnalysisError::Parse {
                row,
                column: name.to_string(),
                value: raw.to_string(),
            }),
        }
    };

    Ok(PriceBar {
        date,
        open: number(columns.open, OPEN)?,
        high: number(columns.high, HIGH)?,
        low: number(columns.low, LOW)?,
        close: number(columns.close, CLOSE)?,
        volume: number(columns.volume, VOLUME)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use std::io::Write;

    fn load(csv: &str) -> Result<PriceTable> {
        load_prices_from_reader(csv.as_bytes())
    }

    #[test]
    fn sorts_rows_by_date() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-03,3,3,3,3,300\n\
                   2024-01-01,1,1,1,1,100\n\
                   2024-01-02,2,2,2,2,200\n";
        let table = load(csv).unwrap();
        let dates: Vec<u32> = table.index().iter().map(Datelike::day).collect();
        assert_eq!(dates, vec![1, 2, 3]);
        assert_eq!(table.values(CLOSE).unwrap(), &[Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn duplicate_dates_are_preserved_in_source_order() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-02,1,1,1,10,1\n\
                   2024-01-01,1,1,1,5,1\n\
                   2024-01-02,1,1,1,20,1\n";
        let table = load(csv).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.values(CLOSE).unwrap(), &[Some(5.0), Some(10.0), Some(20.0)]);
        assert!(table.index().windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn missing_volume_is_schema_error() {
        let csv = "Date,Open,High,Low,Close\n2024-01-01,1,1,1,1\n";
        match load(csv) {
            Err(AnalysisError::Schema { column }) => assert_eq!(column, "Volume"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn first_missing_column_is_reported() {
        let csv = "Date,Close\n2024-01-01,1\n";
        match load(csv) {
            Err(AnalysisError::Schema { column }) => assert_eq!(column, "Open"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let csv = "date,open,high,low,close,volume\n2024-01-01,1,1,1,1,1\n";
        assert!(matches!(load(csv), Err(AnalysisError::Schema { .. })));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = "Ticker,Date,Open,High,Low,Close,Adj Close,Volume\n\
                   AAPL,2024-01-01,1,2,0.5,1.5,1.4,900\n";
        let table = load(csv).unwrap();
        assert_eq!(table.values(VOLUME).unwrap(), &[Some(900.0)]);
        assert_eq!(table.index()[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn bad_date_is_parse_error() {
        let csv = "Date,Open,High,Low,Close,Volume\nyesterday,1,1,1,1,1\n";
        match load(csv) {
            Err(AnalysisError::Parse { row, column, value }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "Date");
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn bad_number_is_parse_error() {
        let csv = "Date,Open,High,Low,Close,Volume\n\
                   2024-01-01,1,1,1,1,1\n\
                   2024-01-02,1,1,1,n/a,1\n";
        match load(csv) {
            Err(AnalysisError::Parse { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Close");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Open,High,Low,Close,Volume").unwrap();
        writeln!(file, "2024-01-01,1,1,1,1,1").unwrap();
        let table = load_prices(file.path()).unwrap();
        assert_eq!(table.len(), 1);
    }
}
