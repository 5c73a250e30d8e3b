//! Full cross-correlation and correlation-based phase delay estimation.
//!
//! The phase of a transducer relative to a reference capture is recovered
//! from the lag at which their cross-correlation peaks. With a known carrier
//! period `T` and sample interval `dt`, a delay of `d` samples corresponds to
//! a phase of `d · dt / T · 2π`.
//!
//! # Convention
//!
//! For inputs of length `L` the full correlation has `2L − 1` entries. Entry
//! `i` corresponds to lag `k = i − (L − 1)`:
//!
//! ```text
//! c[k] = Σ_n signal[n + k] · reference[n]
//! ```
//!
//! so a positive lag means `signal` lags `reference`.
//!
//! # DC removal
//!
//! A DC offset biases the correlation towards zero lag. Callers must
//! subtract the mean of both sequences first, e.g. with [`remove_dc`].

use crate::fft::Fft;
use rustfft::num_complex::Complex;
use std::f64::consts::TAU;

/// Subtract the arithmetic mean from a sequence.
pub fn remove_dc(samples: &[f64]) -> Vec<f64> {
    if samples.is_empty() {
        return Vec::new();
    }
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples.iter().map(|&x| x - mean).collect()
}

/// Direct time-domain full cross-correlation.
///
/// Time complexity O(L²). Output has length `signal.len() + reference.len() − 1`
/// with entry `i` at lag `i − (reference.len() − 1)`.
pub fn correlate_full(signal: &[f64], reference: &[f64]) -> Vec<f64> {
    if signal.is_empty() || reference.is_empty() {
        return Vec::new();
    }
    let offset = reference.len() as isize - 1;
    let len = signal.len() + reference.len() - 1;

    (0..len)
        .map(|i| {
            let lag = i as isize - offset;
            reference
                .iter()
                .enumerate()
                .filter_map(|(n, &r)| {
                    let m = n as isize + lag;
                    (m >= 0 && (m as usize) < signal.len()).then(|| signal[m as usize] * r)
                })
                .sum()
        })
        .collect()
}

/// FFT-based full cross-correlation.
///
/// Same layout as [`correlate_full`], computed as `IFFT(S · conj(R))` with
/// zero-padding to avoid circular wrap-around. O(L log L), but values carry
/// rounding noise of order `1e-12` relative to the peak, so exact ties may
/// resolve differently than in the direct sum.
pub fn correlate_full_fft(signal: &[f64], reference: &[f64]) -> Vec<f64> {
    if signal.is_empty() || reference.is_empty() {
        return Vec::new();
    }
    let len = signal.len() + reference.len() - 1;
    let fft_size = len.next_power_of_two().max(2);
    let fft = Fft::new(fft_size);

    let mut buf_s: Vec<Complex<f64>> = signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buf_s.resize(fft_size, Complex::new(0.0, 0.0));
    let mut buf_r: Vec<Complex<f64>> = reference.iter().map(|&v| Complex::new(v, 0.0)).collect();
    buf_r.resize(fft_size, Complex::new(0.0, 0.0));

    fft.forward_complex(&mut buf_s);
    fft.forward_complex(&mut buf_r);

    for (s, r) in buf_s.iter_mut().zip(buf_r.iter()) {
        *s *= r.conj();
    }

    fft.inverse_complex(&mut buf_s);

    // Positive lags at 0, 1, …; negative lags wrap to fft_size − 1, fft_size − 2, …
    let offset = reference.len() as isize - 1;
    (0..len)
        .map(|i| {
            let lag = i as isize - offset;
            let idx = if lag >= 0 {
                lag as usize
            } else {
                (fft_size as isize + lag) as usize
            };
            buf_s[idx].re
        })
        .collect()
}

/// Index of the largest value; the first one wins on ties. NaNs are skipped.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b || v.is_nan() => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Lag (in samples) at which `signal` best matches `reference`.
///
/// Positive values mean `signal` lags `reference`.
pub fn delay_samples(signal: &[f64], reference: &[f64]) -> isize {
    let corr = correlate_full(signal, reference);
    lag_of_peak(&corr, reference.len())
}

/// Convert a delay in samples to a phase in `[0, 2π)`.
pub fn delay_to_phase(delay: isize, sample_interval: f64, period: f64) -> f64 {
    let mut phase = delay as f64 * sample_interval / period * TAU;
    if phase < 0.0 {
        phase += TAU;
    }
    let phase = phase.rem_euclid(TAU);
    if phase >= TAU { 0.0 } else { phase }
}

/// Estimate the phase delay of `signal` relative to `reference`.
///
/// Both sequences must have equal length and have their mean removed.
/// Returns a phase in `[0, 2π)`.
pub fn estimate_phase_delay(
    signal: &[f64],
    reference: &[f64],
    sample_interval: f64,
    period: f64,
) -> f64 {
    debug_assert_eq!(signal.len(), reference.len(), "signal/reference length mismatch");
    delay_to_phase(delay_samples(signal, reference), sample_interval, period)
}

/// Same as [`estimate_phase_delay`] but using [`correlate_full_fft`].
pub fn estimate_phase_delay_fft(
    signal: &[f64],
    reference: &[f64],
    sample_interval: f64,
    period: f64,
) -> f64 {
    debug_assert_eq!(signal.len(), reference.len(), "signal/reference length mismatch");
    let corr = correlate_full_fft(signal, reference);
    let delay = lag_of_peak(&corr, reference.len());
    delay_to_phase(delay, sample_interval, period)
}

fn lag_of_peak(correlation: &[f64], reference_len: usize) -> isize {
    argmax(correlation).map_or(0, |i| i as isize - (reference_len as isize - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn carrier(n: usize, dt: f64, period: f64, shift: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * (i as f64 * dt) / period - shift).sin())
            .collect()
    }

    #[test]
    fn full_correlation_layout() {
        // np.correlate([1, 2, 3], [0, 1, 0.5], "full") == [0.5, 2, 3.5, 3, 0]
        let c = correlate_full(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5]);
        assert_eq!(c, vec![0.5, 2.0, 3.5, 3.0, 0.0]);
    }

    #[test]
    fn fft_matches_direct() {
        let x = remove_dc(&carrier(200, 1e-6, 25e-6, 0.3));
        let y = remove_dc(&carrier(200, 1e-6, 25e-6, 0.0));
        let direct = correlate_full(&x, &y);
        let fast = correlate_full_fft(&x, &y);
        assert_eq!(direct.len(), fast.len());
        for (i, (d, f)) in direct.iter().zip(fast.iter()).enumerate() {
            assert!((d - f).abs() < 1e-9, "index {i}: direct={d}, fft={f}");
        }
    }

    #[test]
    fn identical_signals_have_zero_delay() {
        let x = remove_dc(&carrier(400, 1e-6, 25e-6, 0.0));
        assert_eq!(delay_samples(&x, &x), 0);
        assert_eq!(estimate_phase_delay(&x, &x, 1e-6, 25e-6), 0.0);
    }

    #[test]
    fn lagging_signal_gives_positive_delay() {
        let n = 300;
        let reference: Vec<f64> = (0..n).map(|i| ((i as f64) * 0.05).sin() * (-(i as f64 - 100.0).powi(2) / 800.0).exp()).collect();
        let mut signal = vec![0.0; n];
        signal[7..].copy_from_slice(&reference[..n - 7]);
        assert_eq!(delay_samples(&signal, &reference), 7);
        assert_eq!(delay_samples(&reference, &signal), -7);
    }

    #[test]
    fn quarter_period_shift() {
        // 25 samples per period; signal delayed by 5 samples = 2π/5
        let dt = 1e-6;
        let period = 25e-6;
        let reference = remove_dc(&carrier(500, dt, period, 0.0));
        let signal = remove_dc(&carrier(500, dt, period, 2.0 * PI / 5.0));
        let phase = estimate_phase_delay(&signal, &reference, dt, period);
        assert!((phase - 2.0 * PI / 5.0).abs() < 1e-9, "phase {phase}");
        let fast = estimate_phase_delay_fft(&signal, &reference, dt, period);
        assert!((fast - phase).abs() < 1e-9);
    }

    #[test]
    fn negative_delay_wraps_into_range() {
        let phase = delay_to_phase(-5, 1e-6, 25e-6);
        assert!((phase - (2.0 * PI - 2.0 * PI / 5.0)).abs() < 1e-12);
        let phase = delay_to_phase(-60, 1e-6, 25e-6);
        assert!((0.0..2.0 * PI).contains(&phase));
        assert!((phase - 2.0 * PI * 15.0 / 25.0).abs() < 1e-9);
    }

    #[test]
    fn argmax_takes_first_maximum() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 1.0]), Some(1));
        assert_eq!(argmax(&[]), None);
    }
}
