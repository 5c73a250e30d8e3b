//! FFT wrapper and one-sided frequency axis

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// FFT processor for a fixed transform size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Get FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Perform forward FFT on real input
    ///
    /// Returns the unnormalized one-sided spectrum (size/2 + 1 bins, DC to
    /// Nyquist). Input shorter than the FFT size is zero-padded, longer input
    /// is truncated.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();

        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);

        buffer.truncate(self.size / 2 + 1);
        buffer
    }

    /// Perform forward FFT on complex input (in-place)
    pub fn forward_complex(&self, buffer: &mut [Complex<f64>]) {
        self.fft.process(buffer);
    }

    /// Perform inverse FFT on complex buffer (in-place, normalized by 1/size)
    pub fn inverse_complex(&self, buffer: &mut [Complex<f64>]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// One-sided frequency axis of an `n`-point real FFT with sample interval `dt`.
///
/// Bin `k` sits at `k / (n * dt)` for `k` in `0..=n/2`.
pub fn rfft_frequencies(n: usize, dt: f64) -> Vec<f64> {
    let spacing = 1.0 / (n as f64 * dt);
    (0..=n / 2).map(|k| k as f64 * spacing).collect()
}

/// Index of the value closest to `target`; the first one wins on ties.
pub fn nearest_index(values: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &v) in values.iter().enumerate() {
        let dist = (v - target).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
