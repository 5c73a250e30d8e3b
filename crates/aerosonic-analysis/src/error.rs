//! Error types for analysis operations.

use crate::fit::FitError;

/// Errors raised by the analysis core.
///
/// The leaf models (spectral extraction, correlation, directivity,
/// attenuation) have no runtime failure modes once a [`Waveform`](crate::Waveform)
/// exists, so the only errors are construction checks and fit failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A waveform needs at least two samples for FFT and correlation.
    #[error("waveform needs at least 2 samples, got {0}")]
    TooShort(usize),

    /// The sample interval must be positive and finite.
    #[error("sample interval must be positive and finite, got {0}")]
    InvalidSampleInterval(f64),

    /// A least-squares fit failed.
    #[error(transparent)]
    Fit(#[from] FitError),
}

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
