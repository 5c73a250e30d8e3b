//! Phase quantization.
//!
//! The array driver encodes phase with a finite number of levels. Rounding a
//! continuous phase to `levels` steps per cycle shows how resolution affects
//! the focus.

use std::f64::consts::TAU;

/// Round `phase` (radians) to the nearest of `levels` equally spaced steps
/// in `[0, 2π)`.
pub fn quantize_phase(phase: f64, levels: u32) -> f64 {
    let levels = f64::from(levels.max(1));
    let cycles = phase / TAU;
    let step = (cycles * levels + 0.5).floor().rem_euclid(levels);
    TAU * step / levels
}

/// Quantize every phase in place.
pub fn quantize_phases(phases: &mut [f64], levels: u32) {
    for p in phases.iter_mut() {
        *p = quantize_phase(*p, levels);
    }
}
