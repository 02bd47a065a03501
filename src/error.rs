// =============================================================================
// Error taxonomy for the analysis pipeline
// =============================================================================
//
// Every stage surfaces its failure immediately; nothing is retried and no
// partial table is returned.  The binary wraps these in `anyhow` with context.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A required column is absent from the input header.
    #[error("missing required column: {column}")]
    Schema { column: String },

    /// A field could not be parsed.  `row` is 1-based over data rows.
    #[error("failed to parse {column} at row {row}: {value:?}")]
    Parse {
        row: usize,
        column: String,
        value: String,
    },

    /// A stage's input column is absent from the in-memory table.
    #[error("column '{0}' not found in data")]
    MissingColumn(String),

    #[error("column '{column}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
