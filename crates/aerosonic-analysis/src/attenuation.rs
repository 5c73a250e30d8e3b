//! Atmospheric absorption of sound.
//!
//! Closed-form model of Bass, Sutherland, Zuckerwar, Blackstock and Hester,
//! "Atmospheric absorption of sound: Further developments",
//! J. Acoust. Soc. Am. 97(1), 680–683 (1995).
//!
//! The coefficient combines a classical (viscous and thermal) term with the
//! vibrational relaxation of oxygen and nitrogen. Relaxation frequencies
//! depend on the absolute humidity, which is derived from the saturation
//! vapour pressure at the given temperature.

/// Reference ambient temperature (K).
pub const REFERENCE_TEMPERATURE: f64 = 293.15;

/// Triple-point isotherm temperature (K).
pub const TRIPLE_POINT_TEMPERATURE: f64 = 273.16;

/// Reference ambient pressure (Pa).
pub const REFERENCE_PRESSURE: f64 = 101_325.0;

/// Attenuation coefficient, scaled by `1e-3`.
///
/// * `freq` - frequency (Hz)
/// * `hr` - relative humidity (percent, as in ISO 9613-1)
/// * `ps` - ambient pressure (Pa)
/// * `ps0` - reference pressure (Pa)
/// * `t` - ambient temperature (K)
///
/// `ps` and `ps0` must be positive.
pub fn attenuation_coefficient(freq: f64, hr: f64, ps: f64, ps0: f64, t: f64) -> f64 {
    let t0 = REFERENCE_TEMPERATURE;
    let t01 = TRIPLE_POINT_TEMPERATURE;

    let psat = ps0 * 10f64.powf(-6.8346 * (t01 / t).powf(1.261) + 4.6151);
    let h = ps0 * (hr / ps) * (psat / ps0);
    let f_ro = (24.0 + 4.04e4 * h * (0.02 + h) / (0.391 + h)) / ps0;
    let f_rn = (1.0 / ps0)
        * (9.0 + 280.0 * h * (-4.17 * ((t0 / t).powf(1.0 / 3.0) - 1.0))).exp()
        * (t0 / t).powf(1.0 / 2.0);
    let f = freq / ps;

    let classical = 1.84 * (t / t0).powf(1.0 / 2.0) * 1e-11;
    let oxygen = 0.01278 * (-2239.1 / t).exp() / (f_ro + f * f / f_ro);
    let nitrogen = 0.1068 * (-3352.0 / t).exp() / (f_rn + f * f / f_rn);

    let alpha = (f * f) / ps0 * ps * (classical + (t / t0).powf(-5.0 / 2.0) * (oxygen + nitrogen));
    alpha * 1e-3
}

/// Inputs of the absorption model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttenuationParameters {
    /// Frequency (Hz).
    pub frequency: f64,
    /// Relative humidity (percent).
    pub relative_humidity: f64,
    /// Ambient pressure (Pa).
    pub pressure: f64,
    /// Reference pressure (Pa).
    pub reference_pressure: f64,
    /// Temperature (K).
    pub temperature: f64,
}

impl Default for AttenuationParameters {
    fn default() -> Self {
        Self {
            frequency: crate::feature::CARRIER_FREQUENCY,
            relative_humidity: 50.0,
            pressure: REFERENCE_PRESSURE,
            reference_pressure: REFERENCE_PRESSURE,
            temperature: REFERENCE_TEMPERATURE,
        }
    }
}

impl AttenuationParameters {
    /// Evaluate [`attenuation_coefficient`] for these parameters.
    pub fn coefficient(&self) -> f64 {
        attenuation_coefficient(
            self.frequency,
            self.relative_humidity,
            self.pressure,
            self.reference_pressure,
            self.temperature,
        )
    }

    /// Same parameters at a different frequency.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }
}
