//! CSV result tables.

use crate::Result;
use std::path::Path;

/// Format a value for a result table; NaN becomes an empty cell.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write a CSV table with a header row.
///
/// Each row is written as-is; rows need not match the header width. NaN
/// cells are written empty.
pub fn write_table<P, H, R>(path: P, header: &[H], rows: &[R]) -> Result<()>
where
    P: AsRef<Path>,
    H: AsRef<str>,
    R: AsRef<[f64]>,
{
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
    writer.write_record(header.iter().map(|h| h.as_ref()))?;
    for row in rows {
        writer.write_record(row.as_ref().iter().map(|&v| format_value(v)))?;
    }
    writer.flush()?;
    tracing::info!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}
