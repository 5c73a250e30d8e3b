//! Analysis settings file format and operations.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

use crate::error::ConfigError;

/// Settings shared by the analysis commands.
///
/// Every field has a default matching the 40 kHz measurement setup, so a
/// settings file only needs the fields it changes.
///
/// # TOML Format
///
/// ```toml
/// target_frequency = 40000.0
/// signal_column = "A Max [mV]"
/// carrier_period = 2.5e-5
/// max_evaluations = 2000
/// initial_exponent = 0.75
/// plane_depth_mm = 200
/// histogram_bins = 36
/// max_duty = 255
/// amplitude_histogram_max = 3.0
///
/// [calibration_duties]
/// start = 10
/// end = 25
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Frequency whose spectral bin is extracted (Hz).
    pub target_frequency: f64,

    /// Capture column holding the microphone signal (matched trimmed).
    pub signal_column: String,

    /// Carrier period used to turn sample delays into phase (s).
    pub carrier_period: f64,

    /// Residual evaluation budget of the power-law fits.
    pub max_evaluations: usize,

    /// Starting exponent of the power-law fits.
    pub initial_exponent: f64,

    /// Largest duty value of a sweep; duty `d` drives at `d/(2·max)·π`.
    pub max_duty: u32,

    /// Microphone depth of the per-transducer captures (mm).
    pub plane_depth_mm: i64,

    /// Number of histogram bins for the per-transducer distributions.
    pub histogram_bins: usize,

    /// Upper end of the amplitude histogram range (Pa).
    pub amplitude_histogram_max: f64,

    /// Duty indices over which covered and uncovered series are compared.
    pub calibration_duties: Range<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_frequency: 40e3,
            signal_column: "A Max [mV]".to_string(),
            carrier_period: 25e-6,
            max_evaluations: 2000,
            initial_exponent: 0.75,
            max_duty: 255,
            plane_depth_mm: 200,
            histogram_bins: 36,
            amplitude_histogram_max: 3.0,
            calibration_duties: 10..25,
        }
    }
}

impl AnalysisConfig {
    /// Load settings from a TOML file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use aerosonic_config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::load("analysis.toml").unwrap();
    /// println!("fitting with {} evaluations", config.max_evaluations);
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
            }
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_frequency.is_finite() && self.target_frequency > 0.0) {
            return Err(ConfigError::invalid(
                "target_frequency",
                format!("{} is not a positive frequency", self.target_frequency),
            ));
        }
        if !(self.carrier_period.is_finite() && self.carrier_period > 0.0) {
            return Err(ConfigError::invalid(
                "carrier_period",
                format!("{} is not a positive period", self.carrier_period),
            ));
        }
        if self.signal_column.trim().is_empty() {
            return Err(ConfigError::invalid("signal_column", "must not be empty"));
        }
        if self.max_evaluations == 0 {
            return Err(ConfigError::invalid("max_evaluations", "must be positive"));
        }
        if !self.initial_exponent.is_finite() {
            return Err(ConfigError::invalid("initial_exponent", "must be finite"));
        }
        if self.calibration_duties.is_empty() {
            return Err(ConfigError::invalid(
                "calibration_duties",
                format!(
                    "{}..{} is empty",
                    self.calibration_duties.start, self.calibration_duties.end
                ),
            ));
        }
        if self.max_duty == 0 {
            return Err(ConfigError::invalid("max_duty", "must be positive"));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::invalid("histogram_bins", "must be positive"));
        }
        if !(self.amplitude_histogram_max.is_finite() && self.amplitude_histogram_max > 0.0) {
            return Err(ConfigError::invalid(
                "amplitude_histogram_max",
                "must be a positive pressure",
            ));
        }
        Ok(())
    }

    /// Drive angle `duty/(2·max_duty)·π` of a duty value.
    pub fn duty_angle(&self, duty: u32) -> f64 {
        f64::from(duty) / (2.0 * f64::from(self.max_duty)) * std::f64::consts::PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_measurement_setup() {
        let c = AnalysisConfig::default();
        assert_eq!(c.target_frequency, 40e3);
        assert_eq!(c.signal_column, "A Max [mV]");
        assert_eq!(c.carrier_period, 25e-6);
        assert_eq!(c.max_evaluations, 2000);
        assert_eq!(c.initial_exponent, 0.75);
        assert_eq!(c.calibration_duties, 10..25);
        assert_eq!(c.histogram_bins, 36);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = AnalysisConfig::from_toml("max_evaluations = 500\n").unwrap();
        assert_eq!(c.max_evaluations, 500);
        assert_eq!(c.target_frequency, 40e3);
        assert_eq!(c.plane_depth_mm, 200);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(AnalysisConfig::from_toml("").unwrap(), AnalysisConfig::default());
    }

    #[test]
    fn calibration_range_table() {
        let c = AnalysisConfig::from_toml("[calibration_duties]\nstart = 5\nend = 8\n").unwrap();
        assert_eq!(c.calibration_duties, 5..8);
    }

    #[test]
    fn toml_string_parses_back() {
        let mut c = AnalysisConfig::default();
        c.histogram_bins = 20;
        c.signal_column = "B Max [mV]".to_string();
        let text = c.to_toml().unwrap();
        assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), c);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AnalysisConfig::from_toml("histogram_bins = 0"),
            Err(ConfigError::Invalid { field: "histogram_bins", .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_toml("target_frequency = -1.0"),
            Err(ConfigError::Invalid { field: "target_frequency", .. })
        ));
        assert!(matches!(
            AnalysisConfig::from_toml("[calibration_duties]\nstart = 3\nend = 3\n"),
            Err(ConfigError::Invalid { field: "calibration_duties", .. })
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            AnalysisConfig::from_toml("max_evaluations = \"many\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn duty_angle_spans_quarter_turn() {
        let c = AnalysisConfig::default();
        assert_eq!(c.duty_angle(0), 0.0);
        assert!((c.duty_angle(255) - std::f64::consts::FRAC_PI_2).abs() < 1e-15);
    }
}
