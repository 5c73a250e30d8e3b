//! Integration tests for aerosonic-config.
//!
//! These tests verify settings files on disk.

use aerosonic_config::{AnalysisConfig, ConfigError, FileOp};
use tempfile::TempDir;

/// Saving into a missing directory creates it and the file loads back.
#[test]
fn test_save_and_load_nested() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings").join("analysis.toml");

    let mut config = AnalysisConfig::default();
    config.max_evaluations = 800;
    config.calibration_duties = 12..30;
    config.save(&path).expect("save should create parent directories");

    let loaded = AnalysisConfig::load(&path).expect("saved settings should load");
    assert_eq!(loaded, config);
}

/// A hand-written file with only a few fields.
#[test]
fn test_load_partial_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(&path, "signal_column = \"  B Max [mV]\"\nhistogram_bins = 18\n").unwrap();

    let config = AnalysisConfig::load(&path).unwrap();
    assert_eq!(config.signal_column, "  B Max [mV]");
    assert_eq!(config.histogram_bins, 18);
    assert_eq!(config.carrier_period, 25e-6);
}

/// Missing files report the path.
#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = AnalysisConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::File { op: FileOp::Read, .. }));
    assert!(err.to_string().contains("nope.toml"));
}

/// Invalid values in a file are rejected on load.
#[test]
fn test_load_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analysis.toml");
    std::fs::write(&path, "carrier_period = 0.0\n").unwrap();

    assert!(matches!(
        AnalysisConfig::load(&path),
        Err(ConfigError::Invalid { field: "carrier_period", .. })
    ));
}
