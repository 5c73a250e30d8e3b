//! Analysis settings for aerosonic.
//!
//! A single [`AnalysisConfig`] carries the constants the analysis commands
//! share: target frequency, capture column, carrier period, fit budget and
//! starting point, calibration duty range and histogram layout. Settings are
//! stored as TOML; missing fields take their defaults.
//!
//! # Example
//!
//! ```rust,no_run
//! use aerosonic_config::AnalysisConfig;
//!
//! let mut config = AnalysisConfig::load("analysis.toml").unwrap();
//! config.histogram_bins = 24;
//! config.save("analysis.toml").unwrap();
//! ```

mod analysis;
mod error;

pub use analysis::AnalysisConfig;
pub use error::{ConfigError, FileOp};
