// =============================================================================
// Enriched table export
// =============================================================================
//
// Writes the date index followed by every column of the table.  Undefined
// values are written as empty fields.

use std::io::Write;
use std::path::Path;

use tracing::info;

use super::price_table::{PriceTable, DATE};
use crate::error::Result;

/// Write `table` as CSV to `path`, creating parent directories as needed.
pub fn write_table(table: &PriceTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_table_to(table, file)?;
    info!(path = %path.display(), rows = table.len(), "enriched table written");
    Ok(())
}

/// Write `table` as CSV to any writer.
pub fn write_table_to<W: Write>(table: &PriceTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DATE.to_string()];
    header.extend(table.column_names().map(str::to_string));
    wtr.write_record(&header)?;

    for (row, date) in table.index().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.format("%Y-%m-%d").to_string());
        for column in table.columns() {
            record.push(match column.values[row] {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
