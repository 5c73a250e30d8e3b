//! Acoustic unit conversions.

/// Heat capacity ratio of air.
pub const HEAT_CAPACITY_RATIO: f64 = 1.403;

/// Molar mass of dry air (kg/mol).
pub const MOLAR_MASS_AIR: f64 = 28.966e-3;

/// Molar gas constant (J/(mol·K)).
pub const GAS_CONSTANT: f64 = 8.314462;

/// RMS sound pressure (Pa) of a sinusoid with peak amplitude `amplitude_mv`
/// measured through a microphone of sensitivity `mv_per_pa`.
pub fn rms_pressure(amplitude_mv: f64, mv_per_pa: f64) -> f64 {
    amplitude_mv / mv_per_pa / std::f64::consts::SQRT_2
}

/// Speed of sound in air (m/s) at `temperature_c` degrees Celsius.
pub fn speed_of_sound(temperature_c: f64) -> f64 {
    let t = 273.15 + temperature_c;
    (HEAT_CAPACITY_RATIO * GAS_CONSTANT * t / MOLAR_MASS_AIR).sqrt()
}

/// Wavelength in millimetres at `temperature_c` for `frequency_khz`.
pub fn wavelength_mm(temperature_c: f64, frequency_khz: f64) -> f64 {
    speed_of_sound(temperature_c) / frequency_khz
}
