//! Aerosonic Analysis - Signal features and model fits for ultrasonic transducer measurements
//!
//! This crate reduces measured or simulated acoustic-pressure waveforms of
//! 40 kHz transducer arrays to scalars and fitted model parameters:
//!
//! - [`fft`] - FFT wrapper and one-sided frequency axis
//! - [`feature`] - Magnitude/phase extraction at a target frequency bin
//! - [`xcorr`] - Full cross-correlation and correlation-based phase delay
//! - [`directivity`] - Spline directivity model of the T4010A1 transducer
//! - [`attenuation`] - Atmospheric absorption (Bass et al. 1995)
//! - [`fit`] - Levenberg-Marquardt fits of the power-law sine and planar phase models
//! - [`stats`] - Normal fit, min-max normalization, histograms, calibration ratio
//! - [`quantize`] - Phase quantization to a finite number of levels
//! - [`fir`] - FIR frequency response and filtering
//! - [`acoustics`] - Speed of sound, wavelength, and pressure unit conversion
//!
//! ## Example Workflow
//!
//! ```rust,ignore
//! use aerosonic_analysis::{Waveform, feature, fit};
//!
//! // 1. Wrap an oscilloscope capture (mV) sampled at 2 MHz
//! let waveform = Waveform::from_sample_rate(samples, 2.0e6)?;
//!
//! // 2. Extract the 40 kHz component
//! let carrier = feature::extract(&waveform, feature::CARRIER_FREQUENCY);
//!
//! // 3. Fit the duty-ratio response of a single transducer
//! let result = fit::fit_sine_power(&x, &normalized, None, &fit::FitOptions::default())?;
//! println!("exponent = {:.3}", result.params[0]);
//! ```

pub mod acoustics;
pub mod attenuation;
pub mod directivity;
pub mod feature;
pub mod fft;
pub mod fir;
pub mod fit;
pub mod quantize;
pub mod stats;
pub mod xcorr;

mod error;
mod waveform;

pub use attenuation::{AttenuationParameters, attenuation_coefficient};
pub use directivity::{gain, gain_db};
pub use error::{AnalysisError, Result};
pub use feature::{CARRIER_FREQUENCY, SpectralFeature, extract};
pub use fft::{Fft, rfft_frequencies};
pub use fit::{FitError, FitOptions, FitResult, Plane, fit_plane, fit_scaled_sine_power, fit_sine_power};
pub use waveform::Waveform;
pub use xcorr::{correlate_full, estimate_phase_delay, remove_dc};
