//! Oscilloscope CSV captures.

use crate::{Error, Result};
use aerosonic_analysis::Waveform;
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// Column holding the microphone channel in oscilloscope exports.
///
/// The exporter pads header names with spaces; lookups trim both sides.
pub const DEFAULT_SIGNAL_COLUMN: &str = "A Max [mV]";

/// Read one numeric column of a comma-separated file with a header row.
///
/// Header names and cells are trimmed before matching and parsing. Fails if
/// the column is absent, a row ends before it, or any of its cells is not a
/// number.
pub fn read_column<P: AsRef<Path>>(path: P, column: &str) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_path(path)?;

    let wanted = column.trim();
    let index = reader
        .headers()?
        .iter()
        .position(|h| h == wanted)
        .ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            column: wanted.to_string(),
        })?;

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let Some(cell) = record.get(index) else {
            return Err(Error::ShortRow {
                path: path.to_path_buf(),
                row,
                fields: record.len(),
                column: wanted.to_string(),
                index,
            });
        };
        let value = cell.parse::<f64>().map_err(|_| Error::Parse {
            path: path.to_path_buf(),
            row,
            value: cell.to_string(),
        })?;
        values.push(value);
    }

    tracing::debug!(path = %path.display(), column = wanted, samples = values.len(), "read capture");
    Ok(values)
}

/// Read a capture column as a [`Waveform`] with the given sample interval.
pub fn read_waveform<P: AsRef<Path>>(path: P, column: &str, sample_interval: f64) -> Result<Waveform> {
    let path = path.as_ref();
    let samples = read_column(path, column)?;
    Waveform::new(samples, sample_interval).map_err(|source| Error::Waveform {
        path: path.to_path_buf(),
        source,
    })
}

/// Read every number of a comma- or whitespace-delimited text file, in order.
pub fn read_numbers<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(row, token)| {
            token.parse::<f64>().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                row,
                value: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn padded_header_is_matched() {
        let file = csv_file("Time,  A Max [mV]\n0, 1.5\n1, -2.0\n2,3e1\n");
        let values = read_column(file.path(), DEFAULT_SIGNAL_COLUMN).unwrap();
        assert_eq!(values, vec![1.5, -2.0, 30.0]);
    }

    #[test]
    fn missing_column_is_reported() {
        let file = csv_file("Time,B\n0,1\n");
        let err = read_column(file.path(), "A Max [mV]").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "A Max [mV]"));
    }

    #[test]
    fn bad_cell_reports_row() {
        let file = csv_file("A\n1\nfoo\n");
        let err = read_column(file.path(), "A").unwrap_err();
        match err {
            Error::Parse { row, value, .. } => {
                assert_eq!(row, 1);
                assert_eq!(value, "foo");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn truncated_row_is_an_error() {
        // a dropped sample would shift every later one by an interval
        let file = csv_file("Time,  A Max [mV]\n0, 1.5\n1\n2, 3.0\n");
        let err = read_column(file.path(), DEFAULT_SIGNAL_COLUMN).unwrap_err();
        match err {
            Error::ShortRow { row, fields, index, .. } => {
                assert_eq!(row, 1);
                assert_eq!(fields, 1);
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn numbers_split_on_commas_and_whitespace() {
        let file = csv_file("0.25, -0.5,\n1e-3\t2\n\n");
        assert_eq!(read_numbers(file.path()).unwrap(), vec![0.25, -0.5, 1e-3, 2.0]);
    }

    #[test]
    fn numbers_reject_text() {
        let file = csv_file("1, two, 3");
        let err = read_numbers(file.path()).unwrap_err();
        assert!(matches!(err, Error::Parse { row: 1, .. }));
    }

    #[test]
    fn short_capture_is_not_a_waveform() {
        let file = csv_file("A\n1\n");
        let err = read_waveform(file.path(), "A", 1e-6).unwrap_err();
        assert!(matches!(err, Error::Waveform { .. }));
    }

    #[test]
    fn waveform_keeps_interval() {
        let file = csv_file("A\n1\n2\n3\n");
        let w = read_waveform(file.path(), "A", 5e-7).unwrap();
        assert_eq!(w.len(), 3);
        assert_eq!(w.sample_interval(), 5e-7);
    }
}
