//! Error types for configuration operations.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// File-system step that failed while handling a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    /// Reading the settings file.
    Read,
    /// Writing the settings file.
    Write,
    /// Creating the directory that holds it.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileOp::Read => "read",
            FileOp::Write => "write",
            FileOp::CreateDir => "create directory",
        })
    }
}

/// Errors that can occur while loading, saving or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file or its directory could not be accessed.
    #[error("cannot {op} '{}': {source}", path.display())]
    File {
        /// What was being done.
        op: FileOp,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`AnalysisConfig`](crate::AnalysisConfig).
    #[error("malformed settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("cannot serialize settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A setting is out of its valid range.
    #[error("invalid setting '{field}': {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    fn file(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::File {
            op,
            path: path.into(),
            source,
        }
    }

    /// The settings file could not be read.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::Read, path, source)
    }

    /// The settings file could not be written.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::Write, path, source)
    }

    /// The directory for the settings file could not be created.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::file(FileOp::CreateDir, path, source)
    }

    /// A setting failed validation.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "no such file")
    }

    #[test]
    fn file_errors_name_step_and_path() {
        let msg = ConfigError::read_file("/a/b.toml", not_found()).to_string();
        assert_eq!(msg, "cannot read '/a/b.toml': no such file");

        let err = ConfigError::create_dir("/a", not_found());
        assert!(matches!(err, ConfigError::File { op: FileOp::CreateDir, .. }));
        assert!(err.to_string().starts_with("cannot create directory '/a'"));
    }

    #[test]
    fn invalid_display() {
        let err = ConfigError::invalid("histogram_bins", "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid setting 'histogram_bins': must be positive"
        );
    }

    #[test]
    fn only_file_errors_have_a_source() {
        assert!(ConfigError::write_file("/x", not_found()).source().is_some());
        assert!(ConfigError::invalid("x", "y").source().is_none());
    }
}
