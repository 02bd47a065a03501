use chrono::NaiveDate;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

/// Raw OHLCV columns, in the order the loader validates them (after `Date`).
pub const RAW_COLUMNS: [&str; 5] = [OPEN, HIGH, LOW, CLOSE, VOLUME];

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single daily OHLCV record as read from the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A named numeric series aligned 1:1 with the table index.
///
/// `None` marks an undefined value, e.g. the warm-up records of a windowed
/// indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Column {
    /// Most recent defined value, if any.
    pub fn last_defined(&self) -> Option<f64> {
        self.values.iter().rev().find_map(|v| *v)
    }
}

// ---------------------------------------------------------------------------
// PriceTable
// ---------------------------------------------------------------------------

/// Column-oriented price table keyed by date.
///
/// The loader builds it with the five raw columns; pipeline stages append
/// derived columns.  Rows are never added or removed after construction.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    index: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl PriceTable {
    /// Build a table from bars that are already in their final row order.
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let index = bars.iter().map(|b| b.date).collect();
        let raw = |f: fn(&PriceBar) -> f64| -> Vec<Option<f64>> {
            bars.iter().map(|b| Some(f(b))).collect()
        };
        let columns = vec![
            Column { name: OPEN.into(), values: raw(|b| b.open) },
            Column { name: HIGH.into(), values: raw(|b| b.high) },
            Column { name: LOW.into(), values: raw(|b| b.low) },
            Column { name: CLOSE.into(), values: raw(|b| b.close) },
            Column { name: VOLUME.into(), values: raw(|b| b.volume) },
        ];
        Self { index, columns }
    }

    /// Build a table from an index and arbitrary columns.
    ///
    /// Used when a stage runs on data that did not come through the loader.
    /// Rows are stably sorted by date, the same order the loader produces.
    pub fn from_columns(index: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self> {
        let mut table = Self {
            index,
            columns: Vec::with_capacity(columns.len()),
        };
        for column in columns {
            table.insert_column(&column.name, column.values)?;
        }
        table.sort_by_date();
        Ok(table)
    }

    fn sort_by_date(&mut self) {
        if self.index.windows(2).all(|w| w[0] <= w[1]) {
            return;
        }
        let mut order: Vec<usize> = (0..self.index.len()).collect();
        order.sort_by_key(|&i| self.index[i]);

        self.index = order.iter().map(|&i| self.index[i]).collect();
        for column in &mut self.columns {
            column.values = order.iter().map(|&i| column.values[i]).collect();
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    /// Like [`values`](Self::values) but a missing column is an error.
    pub fn require(&self, name: &str) -> Result<&[Option<f64>]> {
        self.values(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Append a column, or replace the values of an existing column with the
    /// same name.
    pub fn insert_column(&mut self, name: &str, values: Vec<Option<f64>>) -> Result<()> {
        if values.len() != self.index.len() {
            return Err(AnalysisError::LengthMismatch {
                column: name.to_string(),
                expected: self.index.len(),
                actual: values.len(),
            });
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }
}
