//! Shared CLI helpers used across multiple commands.

use aerosonic_analysis::{FitOptions, SpectralFeature, acoustics, extract};
use aerosonic_config::AnalysisConfig;
use aerosonic_io::{Conditions, read_waveform};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Load analysis settings, or defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AnalysisConfig> {
    match path {
        Some(path) => {
            let config = AnalysisConfig::load(path)?;
            tracing::info!(path = %path.display(), "loaded settings");
            Ok(config)
        }
        None => Ok(AnalysisConfig::default()),
    }
}

/// Carrier component of one capture.
pub fn carrier(path: &Path, cond: &Conditions, config: &AnalysisConfig) -> anyhow::Result<SpectralFeature> {
    let waveform = read_waveform(path, &config.signal_column, cond.sample_interval())?;
    Ok(extract(&waveform, config.target_frequency))
}

/// RMS sound pressure (Pa) of the carrier in one capture.
pub fn carrier_rms(path: &Path, cond: &Conditions, config: &AnalysisConfig) -> anyhow::Result<f64> {
    let feature = carrier(path, cond, config)?;
    Ok(acoustics::rms_pressure(feature.magnitude, cond.mv_per_pa))
}

/// Load `cond.txt` of a run directory with the path in the error.
pub fn conditions(dir: &Path) -> anyhow::Result<Conditions> {
    Conditions::load_dir(dir).with_context(|| format!("reading conditions of {}", dir.display()))
}

/// Fit options for the power-law fits.
pub fn power_fit_options(config: &AnalysisConfig) -> FitOptions {
    FitOptions::with_max_evaluations(config.max_evaluations)
}

/// Progress bar over `len` files.
pub fn progress_bar(len: usize, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_message(message);
    pb
}

/// `prefix` with `suffix` appended to its file name.
pub fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Print a JSON summary to stdout.
pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Smallest and largest finite value.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
