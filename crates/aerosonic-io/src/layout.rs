//! File and folder naming of the measurement tree.
//!
//! ```text
//! single_amp/    cond.txt amp0.csv … amp255.csv
//! single_input/  cond.txt input0.csv … input255.csv
//! single_phase/  cond.txt phase0.csv … phase255.csv
//! xy/            cond.txt x-40.0y-40.0z150.0.csv …
//! saturation/    saturation_1x1_z150/ saturation_cover_1x1_z150/ … (duty<n>.csv)
//! individual/    dev0/<transducer>/x…y…z….csv …
//! ```

use crate::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const NUMBER: &str = r"[+-]?\d+(?:\.\d+)?";

static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
static COVER_REGEX: OnceLock<Regex> = OnceLock::new();
static DEVICE_REGEX: OnceLock<Regex> = OnceLock::new();

fn position_regex() -> &'static Regex {
    POSITION_REGEX.get_or_init(|| {
        Regex::new(&format!(r"^x({NUMBER})y({NUMBER})z({NUMBER})\.csv$"))
            .expect("invalid regex pattern")
    })
}

fn cover_regex() -> &'static Regex {
    COVER_REGEX.get_or_init(|| {
        Regex::new(r"^saturation_cover_(\d+)x(\d+)_z(\d+)$").expect("invalid regex pattern")
    })
}

fn device_regex() -> &'static Regex {
    DEVICE_REGEX.get_or_init(|| Regex::new(r"^dev(\d+)$").expect("invalid regex pattern"))
}

/// Indexed capture series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// `duty<n>.csv`, saturation duty sweeps.
    Duty,
    /// `amp<n>.csv`, microphone captures of the single transducer duty sweep.
    Amp,
    /// `input<n>.csv`, drive signal captures of the same sweep.
    Input,
    /// `phase<n>.csv`, phase step captures.
    Phase,
}

impl SeriesKind {
    /// Filename prefix before the index.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Duty => "duty",
            Self::Amp => "amp",
            Self::Input => "input",
            Self::Phase => "phase",
        }
    }

    /// File name for index `n`.
    pub fn file_name(self, n: u32) -> String {
        format!("{}{n}.csv", self.prefix())
    }
}

/// Index of an indexed capture file name, e.g. `duty12.csv` → 12.
pub fn parse_indexed(name: &str, kind: SeriesKind) -> Option<u32> {
    let digits = name.strip_prefix(kind.prefix())?.strip_suffix(".csv")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Microphone position in mm encoded in a capture file name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// X in mm.
    pub x: f64,
    /// Y in mm.
    pub y: f64,
    /// Z in mm.
    pub z: f64,
}

impl Position {
    /// Depth truncated to whole millimetres.
    pub fn depth_mm(&self) -> i64 {
        self.z.trunc() as i64
    }

    /// File name for this position, e.g. `x1.5y-2z150.csv`.
    pub fn file_name(&self) -> String {
        format!("x{:?}y{:?}z{:?}.csv", self.x, self.y, self.z)
    }
}

/// Parse `x<f>y<f>z<f>.csv`.
pub fn parse_position(name: &str) -> Option<Position> {
    let caps = position_regex().captures(name)?;
    Some(Position {
        x: caps[1].parse().ok()?,
        y: caps[2].parse().ok()?,
        z: caps[3].parse().ok()?,
    })
}

/// A covered saturation run folder, `saturation_cover_<d1>x<d2>_z<z>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverFolder {
    /// Modules along the first axis.
    pub d1: u32,
    /// Modules along the second axis.
    pub d2: u32,
    /// Depth in mm encoded in the folder name.
    pub z: u32,
}

impl CoverFolder {
    /// Number of array modules.
    pub fn modules(&self) -> u32 {
        self.d1 * self.d2
    }

    /// Folder name of the matching uncovered run.
    pub fn uncovered_name(&self) -> String {
        format!("saturation_{}x{}_z{}", self.d1, self.d2, self.z)
    }

    /// Folder name of this covered run.
    pub fn covered_name(&self) -> String {
        format!("saturation_cover_{}x{}_z{}", self.d1, self.d2, self.z)
    }
}

/// Parse `saturation_cover_<d1>x<d2>_z<z>`.
pub fn parse_cover_folder(name: &str) -> Option<CoverFolder> {
    let caps = cover_regex().captures(name)?;
    Some(CoverFolder {
        d1: caps[1].parse().ok()?,
        d2: caps[2].parse().ok()?,
        z: caps[3].parse().ok()?,
    })
}

/// Parse `dev<n>`.
pub fn parse_device(name: &str) -> Option<u32> {
    device_regex().captures(name)?[1].parse().ok()
}

/// Entries of `dir` whose file name parses, sorted by path.
fn scan<T, F>(dir: &Path, want_dir: bool, parse: F) -> Result<Vec<(T, PathBuf)>>
where
    F: Fn(&str) -> Option<T>,
{
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() != want_dir {
            continue;
        }
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(key) = parse(name) {
            found.push((key, path));
        }
    }
    found.sort_by(|a, b| a.1.cmp(&b.1));
    tracing::debug!(dir = %dir.display(), count = found.len(), "scanned");
    Ok(found)
}

/// Indexed captures of `kind` in `dir`, sorted by index.
pub fn scan_indexed<P: AsRef<Path>>(dir: P, kind: SeriesKind) -> Result<Vec<(u32, PathBuf)>> {
    let mut found = scan(dir.as_ref(), false, |name| parse_indexed(name, kind))?;
    found.sort_by_key(|(index, _)| *index);
    Ok(found)
}

/// Position-named captures in `dir`, sorted by path.
pub fn scan_positions<P: AsRef<Path>>(dir: P) -> Result<Vec<(Position, PathBuf)>> {
    scan(dir.as_ref(), false, parse_position)
}

/// Position-named captures one directory level below `device_dir`.
///
/// Each transducer of a device is measured into its own subdirectory.
pub fn scan_transducers<P: AsRef<Path>>(device_dir: P) -> Result<Vec<(Position, PathBuf)>> {
    let mut found = Vec::new();
    for (_, sub) in scan(device_dir.as_ref(), true, |_| Some(()))? {
        found.extend(scan_positions(sub)?);
    }
    Ok(found)
}

/// `dev<n>` subdirectories of `root`, sorted by device number.
pub fn scan_devices<P: AsRef<Path>>(root: P) -> Result<Vec<(u32, PathBuf)>> {
    let mut found = scan(root.as_ref(), true, parse_device)?;
    found.sort_by_key(|(index, _)| *index);
    Ok(found)
}

/// Covered saturation folders under `root`, largest array first.
pub fn scan_cover_folders<P: AsRef<Path>>(root: P) -> Result<Vec<(CoverFolder, PathBuf)>> {
    let mut found = scan(root.as_ref(), true, parse_cover_folder)?;
    found.sort_by(|a, b| b.0.modules().cmp(&a.0.modules()));
    Ok(found)
}
