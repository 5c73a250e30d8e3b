//! FIR filter response and filtering.
//!
//! Used to characterize the low-pass filter applied to phase updates on the
//! array driver: its frequency response and its effect on a phase step.

use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Default number of frequency points of [`frequency_response`].
pub const DEFAULT_RESPONSE_POINTS: usize = 512;

/// Taps of the low-pass filter applied to phase updates on the array driver
/// (sampled at 40 kHz).
///
/// The taps sum to [`PHASE_LPF_GAIN`], not 1.
pub const PHASE_LPF: [f64; 199] = [
    -0.000094, -0.000126, -0.000163, -0.000205, -0.000252, -0.000305, -0.000362, -0.000424,
    -0.000491, -0.000563, -0.000638, -0.000717, -0.000798, -0.000881, -0.000964, -0.001047,
    -0.001127, -0.001204, -0.001275, -0.001339, -0.001392, -0.001433, -0.001458, -0.001465,
    -0.001451, -0.001412, -0.001345, -0.001245, -0.001110, -0.000934, -0.000713, -0.000444,
    -0.000121, 0.000261, 0.000706, 0.001219, 0.001805, 0.002468, 0.003214, 0.004048,
    0.004973, 0.005995, 0.007118, 0.008347, 0.009684, 0.011134, 0.012700, 0.014385,
    0.016192, 0.018123, 0.020179, 0.022362, 0.024672, 0.027111, 0.029676, 0.032367,
    0.035184, 0.038122, 0.041180, 0.044353, 0.047638, 0.051029, 0.054522, 0.058109,
    0.061784, 0.065539, 0.069366, 0.073256, 0.077201, 0.081189, 0.085211, 0.089255,
    0.093311, 0.097367, 0.101411, 0.105431, 0.109414, 0.113347, 0.117218, 0.121015,
    0.124724, 0.128332, 0.131828, 0.135200, 0.138434, 0.141520, 0.144447, 0.147204,
    0.149780, 0.152166, 0.154353, 0.156333, 0.158098, 0.159642, 0.160959, 0.162043,
    0.162890, 0.163498, 0.163864, 0.163986, 0.163864, 0.163498, 0.162890, 0.162043,
    0.160959, 0.159642, 0.158098, 0.156333, 0.154353, 0.152166, 0.149780, 0.147204,
    0.144447, 0.141520, 0.138434, 0.135200, 0.131828, 0.128332, 0.124724, 0.121015,
    0.117218, 0.113347, 0.109414, 0.105431, 0.101411, 0.097367, 0.093311, 0.089255,
    0.085211, 0.081189, 0.077201, 0.073256, 0.069366, 0.065539, 0.061784, 0.058109,
    0.054522, 0.051029, 0.047638, 0.044353, 0.041180, 0.038122, 0.035184, 0.032367,
    0.029676, 0.027111, 0.024672, 0.022362, 0.020179, 0.018123, 0.016192, 0.014385,
    0.012700, 0.011134, 0.009684, 0.008347, 0.007118, 0.005995, 0.004973, 0.004048,
    0.003214, 0.002468, 0.001805, 0.001219, 0.000706, 0.000261, -0.000121, -0.000444,
    -0.000713, -0.000934, -0.001110, -0.001245, -0.001345, -0.001412, -0.001451, -0.001465,
    -0.001458, -0.001433, -0.001392, -0.001339, -0.001275, -0.001204, -0.001127, -0.001047,
    -0.000964, -0.000881, -0.000798, -0.000717, -0.000638, -0.000563, -0.000491, -0.000424,
    -0.000362, -0.000305, -0.000252, -0.000205, -0.000163, -0.000126, -0.000094,
];

/// DC gain of [`PHASE_LPF`].
pub const PHASE_LPF_GAIN: f64 = 10.0;

/// Sample rate of [`PHASE_LPF`] in Hz.
pub const PHASE_LPF_SAMPLE_RATE: f64 = 40e3;

/// Frequency response of an FIR filter.
///
/// Evaluates `H(f) = Σ_k b[k]·e^{−j2πfk/fs}` at `points` frequencies spaced
/// evenly over `[0, fs/2)`. Returns `(frequency, response)` pairs.
pub fn frequency_response(coeffs: &[f64], points: usize, fs: f64) -> Vec<(f64, Complex<f64>)> {
    (0..points)
        .map(|i| {
            let f = fs / 2.0 * i as f64 / points as f64;
            let w = 2.0 * PI * f / fs;
            let h: Complex<f64> = coeffs
                .iter()
                .enumerate()
                .map(|(k, &b)| Complex::from_polar(b, -w * k as f64))
                .sum();
            (f, h)
        })
        .collect()
}

/// Apply an FIR filter to `input` with zero initial state.
pub fn filter(coeffs: &[f64], input: &[f64]) -> Vec<f64> {
    (0..input.len())
        .map(|n| {
            coeffs
                .iter()
                .take(n + 1)
                .enumerate()
                .map(|(k, &b)| b * input[n - k])
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dc_gain_is_coefficient_sum() {
        let coeffs = [0.25, 0.5, 0.25];
        let response = frequency_response(&coeffs, 8, 1000.0);
        assert_eq!(response.len(), 8);
        assert_eq!(response[0].0, 0.0);
        assert!((response[0].1.norm() - 1.0).abs() < 1e-12);
        assert!((response[7].0 - 437.5).abs() < 1e-9);
    }

    #[test]
    fn moving_average_rejects_nyquist() {
        // [0.5, 0.5] has a zero at fs/2
        let response = frequency_response(&[0.5, 0.5], 1000, 2.0);
        let last = response.last().unwrap().1.norm();
        assert!(last < 0.01, "{last}");
    }

    #[test]
    fn filter_step_response_settles_to_sum() {
        let coeffs = [0.2, 0.3, 0.5];
        let step = vec![1.0; 6];
        let out = filter(&coeffs, &step);
        assert!((out[0] - 0.2).abs() < 1e-12);
        assert!((out[1] - 0.5).abs() < 1e-12);
        assert!((out[5] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn phase_lpf_is_symmetric_with_gain_ten() {
        let sum: f64 = PHASE_LPF.iter().sum();
        assert!((sum - PHASE_LPF_GAIN).abs() < 1e-4, "{sum}");
        for (a, b) in PHASE_LPF.iter().zip(PHASE_LPF.iter().rev()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn phase_lpf_rejects_above_cutoff() {
        // response on the 20 kHz axis of the driver documentation
        let response = frequency_response(&PHASE_LPF, DEFAULT_RESPONSE_POINTS, 20e3);
        let db = |h: Complex<f64>| 20.0 * (h.norm() / PHASE_LPF_GAIN).log10();
        assert!(db(response[0].1).abs() < 1e-3);
        assert!(db(response[50].1) < -80.0);
    }

    #[test]
    fn impulse_response_is_coefficients() {
        let coeffs = [1.0, -2.0, 3.0];
        let out = filter(&coeffs, &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(out, vec![1.0, -2.0, 3.0, 0.0]);
    }
}
