//! Measurement file layer for aerosonic.
//!
//! This crate provides:
//!
//! - **Captures**: [`read_column`] and [`read_waveform`] for oscilloscope CSV exports
//! - **Conditions**: [`Conditions`] parsed from the `cond.txt` written next to each run
//! - **Layout**: filename and folder patterns of the measurement tree and
//!   directory scanners ([`scan_indexed`], [`scan_positions`], …)
//! - **Results**: [`write_table`] for CSV result tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use aerosonic_io::{Conditions, SeriesKind, read_waveform, scan_indexed};
//!
//! let cond = Conditions::load(dir.join("cond.txt"))?;
//! for (duty, path) in scan_indexed(&dir, SeriesKind::Amp)? {
//!     let waveform = read_waveform(&path, "A Max [mV]", cond.sample_interval())?;
//!     // ...
//! }
//! ```

mod capture;
mod conditions;
mod layout;
mod table;

use std::path::PathBuf;

pub use capture::{DEFAULT_SIGNAL_COLUMN, read_column, read_numbers, read_waveform};
pub use conditions::{CONDITIONS_FILE, Conditions};
pub use layout::{
    CoverFolder, Position, SeriesKind, parse_cover_folder, parse_device, parse_indexed,
    parse_position, scan_cover_folders, scan_devices, scan_indexed, scan_positions,
    scan_transducers,
};
pub use table::{format_value, write_table};

/// Error types for measurement file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested column is not in the header row.
    #[error("{}: no column named '{column}'", path.display())]
    MissingColumn {
        /// File that was searched.
        path: PathBuf,
        /// Trimmed column name.
        column: String,
    },

    /// A cell could not be parsed as a number.
    #[error("{}: row {row}: cannot parse '{value}' as a number", path.display())]
    Parse {
        /// File containing the cell.
        path: PathBuf,
        /// Zero-based data row (header excluded), or token index for plain number lists.
        row: usize,
        /// Raw cell content.
        value: String,
    },

    /// A data row ends before the requested column.
    #[error("{}: row {row} has {fields} fields, column '{column}' is field {}", path.display(), index + 1)]
    ShortRow {
        /// File containing the row.
        path: PathBuf,
        /// Zero-based data row (header excluded).
        row: usize,
        /// Number of fields in the row.
        fields: usize,
        /// Requested column.
        column: String,
        /// Zero-based position of the column in the header.
        index: usize,
    },

    /// The conditions file lacks a required row.
    #[error("{}: missing conditions row {row} ({name})", path.display())]
    MissingCondition {
        /// Conditions file.
        path: PathBuf,
        /// Zero-based row index.
        row: usize,
        /// Field name.
        name: &'static str,
    },

    /// The capture could not be turned into a waveform.
    #[error("{}: {source}", path.display())]
    Waveform {
        /// Capture file.
        path: PathBuf,
        /// Underlying validation error.
        source: aerosonic_analysis::AnalysisError,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for measurement file operations.
pub type Result<T> = std::result::Result<T, Error>;
