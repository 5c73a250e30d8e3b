//! Magnitude and phase of a single frequency bin.
//!
//! The transducers are driven at 40 kHz, so every measurement is reduced to
//! the complex amplitude of the FFT bin closest to the carrier. The spectrum
//! is normalized by `N/2`, which maps a pure sinusoid of amplitude `A` to a
//! magnitude of `A`.

use crate::fft::{Fft, nearest_index, rfft_frequencies};
use crate::waveform::Waveform;

/// Driving frequency of the transducers (Hz).
pub const CARRIER_FREQUENCY: f64 = 40e3;

/// Magnitude and phase of one spectral bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFeature {
    /// Centre frequency of the selected bin (Hz).
    pub frequency: f64,
    /// Amplitude, in the units of the waveform samples.
    pub magnitude: f64,
    /// Phase in radians, in (-π, π].
    pub phase: f64,
}

/// Extract the feature of the bin closest to `target_frequency`.
///
/// Targets beyond Nyquist (or negative) select the nearest representable
/// bin; equidistant bins resolve to the lower index.
pub fn extract(waveform: &Waveform, target_frequency: f64) -> SpectralFeature {
    let n = waveform.len();
    let fft = Fft::new(n);
    let spectrum = fft.forward(waveform.samples());
    let frequencies = rfft_frequencies(n, waveform.sample_interval());

    let idx = nearest_index(&frequencies, target_frequency);
    let coefficient = spectrum[idx] / (n as f64 / 2.0);

    SpectralFeature {
        frequency: frequencies[idx],
        magnitude: coefficient.norm(),
        phase: coefficient.arg(),
    }
}

/// Amplitude of the bin closest to `target_frequency`.
pub fn amplitude_at(waveform: &Waveform, target_frequency: f64) -> f64 {
    extract(waveform, target_frequency).magnitude
}

/// Phase of the bin closest to `target_frequency`.
pub fn phase_at(waveform: &Waveform, target_frequency: f64) -> f64 {
    extract(waveform, target_frequency).phase
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(amplitude: f64, freq: f64, phase: f64, sample_rate: f64, n: usize) -> Waveform {
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / sample_rate + phase).cos())
            .collect();
        Waveform::from_sample_rate(samples, sample_rate).unwrap()
    }

    #[test]
    fn bin_centred_tone_recovers_amplitude_and_phase() {
        // 2 MHz, 1000 samples -> 2 kHz bins, 40 kHz is bin 20
        let w = tone(3.5, 40e3, 0.7, 2.0e6, 1000);
        let f = extract(&w, CARRIER_FREQUENCY);

        assert!((f.frequency - 40e3).abs() < 1e-6);
        assert!((f.magnitude - 3.5).abs() < 1e-9, "magnitude {}", f.magnitude);
        assert!((f.phase - 0.7).abs() < 1e-9, "phase {}", f.phase);
    }

    #[test]
    fn sine_has_minus_half_pi_phase() {
        let samples: Vec<f64> = (0..500)
            .map(|i| (2.0 * PI * 40e3 * i as f64 / 1.0e6).sin())
            .collect();
        let w = Waveform::from_sample_rate(samples, 1.0e6).unwrap();
        let f = extract(&w, 40e3);
        assert!((f.magnitude - 1.0).abs() < 1e-9);
        assert!((f.phase + PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn beyond_nyquist_selects_last_bin() {
        let w = tone(1.0, 10.0, 0.0, 100.0, 10);
        let f = extract(&w, 1e6);
        assert!((f.frequency - 50.0).abs() < 1e-9);
    }

    #[test]
    fn equidistant_target_selects_lower_bin() {
        // bins at 0, 10, 20, ... Hz; 15 Hz is halfway between 10 and 20
        let w = tone(1.0, 10.0, 0.0, 100.0, 10);
        let f = extract(&w, 15.0);
        assert!((f.frequency - 10.0).abs() < 1e-9);
        assert!((f.magnitude - 1.0).abs() < 1e-9);
    }

    #[test]
    fn two_sample_waveform_is_supported() {
        let w = Waveform::new(vec![1.0, -1.0], 1.0).unwrap();
        let f = extract(&w, 0.5);
        assert!((f.frequency - 0.5).abs() < 1e-12);
        assert!((f.magnitude - 2.0).abs() < 1e-12);
    }

    #[test]
    fn odd_length_normalizes_by_half_length() {
        let n = 999;
        let sample_rate = n as f64 * 1e3; // 1 kHz bins
        let w = tone(2.0, 40e3, 0.0, sample_rate, n);
        assert!((amplitude_at(&w, 40e3) - 2.0).abs() < 1e-9);
        assert!(phase_at(&w, 40e3).abs() < 1e-9);
    }
}
