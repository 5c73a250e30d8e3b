//! Sampled waveform with its sample interval.

use crate::error::{AnalysisError, Result};

/// An ordered sequence of real samples paired with the sample interval.
///
/// Construction validates that there are at least two samples and that the
/// interval is positive and finite; after that the waveform is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_interval: f64,
}

impl Waveform {
    /// Create a waveform from samples and a sample interval in seconds.
    pub fn new(samples: Vec<f64>, sample_interval: f64) -> Result<Self> {
        if samples.len() < 2 {
            return Err(AnalysisError::TooShort(samples.len()));
        }
        if !(sample_interval.is_finite() && sample_interval > 0.0) {
            return Err(AnalysisError::InvalidSampleInterval(sample_interval));
        }
        Ok(Self {
            samples,
            sample_interval,
        })
    }

    /// Create a waveform from samples and a sample rate in Hz.
    pub fn from_sample_rate(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        Self::new(samples, 1.0 / sample_rate)
    }

    /// Samples of the waveform.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample interval in seconds.
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        1.0 / self.sample_interval
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; a waveform holds at least two samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Arithmetic mean of the samples.
    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Copy of this waveform with its mean subtracted.
    pub fn without_dc(&self) -> Self {
        Self {
            samples: crate::xcorr::remove_dc(&self.samples),
            sample_interval: self.sample_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_sample() {
        assert_eq!(
            Waveform::new(vec![1.0], 1e-6),
            Err(AnalysisError::TooShort(1))
        );
    }

    #[test]
    fn rejects_non_positive_interval() {
        assert!(matches!(
            Waveform::new(vec![0.0, 1.0], 0.0),
            Err(AnalysisError::InvalidSampleInterval(_))
        ));
        assert!(matches!(
            Waveform::new(vec![0.0, 1.0], f64::NAN),
            Err(AnalysisError::InvalidSampleInterval(_))
        ));
    }

    #[test]
    fn sample_rate_roundtrip() {
        let w = Waveform::from_sample_rate(vec![0.0; 8], 2.0e6).unwrap();
        assert!((w.sample_interval() - 5e-7).abs() < 1e-20);
        assert!((w.sample_rate() - 2.0e6).abs() < 1e-6);
    }

    #[test]
    fn without_dc_has_zero_mean() {
        let w = Waveform::new(vec![1.0, 2.0, 3.0, 6.0], 1.0).unwrap();
        assert!((w.mean() - 3.0).abs() < 1e-12);
        assert!(w.without_dc().mean().abs() < 1e-12);
    }
}
