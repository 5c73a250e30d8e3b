//! Measurement conditions (`cond.txt`).
//!
//! Each run directory carries a `cond.txt` of `label, value` rows in a fixed
//! order. Rows are identified by position; labels are ignored.

use crate::{Error, Result};
use csv::{ReaderBuilder, Trim};
use std::fmt::Write as _;
use std::path::Path;

/// File name of the conditions file inside a run directory.
pub const CONDITIONS_FILE: &str = "cond.txt";

const ROW_NAMES: [&str; 9] = [
    "Sample Rate [Hz]",
    "Sample Length",
    "Amplifier [mV/Pa]",
    "Temp. [℃]",
    "Humidity [%]",
    "Wavelength [mm]",
    "X [mm]",
    "Y [mm]",
    "Z [mm]",
];

/// Conditions recorded with a measurement run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    /// Oscilloscope sample rate in Hz.
    pub sample_rate: f64,
    /// Samples per capture.
    pub sample_length: usize,
    /// Microphone sensitivity in mV/Pa.
    pub mv_per_pa: f64,
    /// Air temperature in °C.
    pub temperature: Option<f64>,
    /// Relative humidity in percent.
    pub humidity: Option<f64>,
    /// Carrier wavelength in mm.
    pub wavelength: Option<f64>,
    /// Array center X in mm.
    pub x: Option<f64>,
    /// Array center Y in mm.
    pub y: Option<f64>,
    /// Microphone depth Z in mm.
    pub z: Option<f64>,
}

impl Conditions {
    /// Conditions with only the required rows set.
    pub fn new(sample_rate: f64, sample_length: usize, mv_per_pa: f64) -> Self {
        Self {
            sample_rate,
            sample_length,
            mv_per_pa,
            temperature: None,
            humidity: None,
            wavelength: None,
            x: None,
            y: None,
            z: None,
        }
    }

    /// Load conditions from a `cond.txt` file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path)?;
        Self::parse(&content, path)
    }

    /// Load `cond.txt` from a run directory.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        Self::load(dir.as_ref().join(CONDITIONS_FILE))
    }

    fn parse(content: &[u8], path: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content);

        let mut values: Vec<Option<f64>> = Vec::new();
        for (row, record) in reader.byte_records().enumerate() {
            let record = record?;
            let value = match record.get(1) {
                Some(cell) if !cell.is_empty() => {
                    let text = String::from_utf8_lossy(cell);
                    let parsed = text.parse::<f64>().map_err(|_| Error::Parse {
                        path: path.to_path_buf(),
                        row,
                        value: text.to_string(),
                    })?;
                    Some(parsed)
                }
                _ => None,
            };
            values.push(value);
        }

        let required = |row: usize| {
            values
                .get(row)
                .copied()
                .flatten()
                .ok_or_else(|| Error::MissingCondition {
                    path: path.to_path_buf(),
                    row,
                    name: ROW_NAMES[row],
                })
        };
        let optional = |row: usize| values.get(row).copied().flatten();

        let cond = Self {
            sample_rate: required(0)?,
            sample_length: required(1)? as usize,
            mv_per_pa: required(2)?,
            temperature: optional(3),
            humidity: optional(4),
            wavelength: optional(5),
            x: optional(6),
            y: optional(7),
            z: optional(8),
        };
        tracing::debug!(path = %path.display(), ?cond, "loaded conditions");
        Ok(cond)
    }

    /// Seconds between samples.
    pub fn sample_interval(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Microphone depth truncated to whole millimetres.
    pub fn depth_mm(&self) -> Option<i64> {
        self.z.map(|z| z.trunc() as i64)
    }

    /// Render in the `cond.txt` layout. Absent optional rows end the file.
    pub fn to_text(&self) -> String {
        let rows = [
            Some(self.sample_rate),
            Some(self.sample_length as f64),
            Some(self.mv_per_pa),
            self.temperature,
            self.humidity,
            self.wavelength,
            self.x,
            self.y,
            self.z,
        ];
        let mut out = String::new();
        for (name, value) in ROW_NAMES.iter().zip(rows) {
            let Some(value) = value else {
                break;
            };
            let _ = writeln!(out, "{name}, {value}");
        }
        out
    }

    /// Write to `path` in the `cond.txt` layout.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_text())?;
        Ok(())
    }
}
