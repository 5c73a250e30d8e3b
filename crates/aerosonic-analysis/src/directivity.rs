//! Directivity model of the T4010A1 ultrasonic transducer.
//!
//! The far-field pattern is a third-degree spline sampled from the
//! manufacturer datasheet, one cubic per 10° sector between 0° and 90°:
//!
//! ```text
//! D(θ) = A[i] + B[i]·x + C[i]·x² + D[i]·x³,   i = ceil(θ / 10°),  x = θ − (i − 1)·10°
//! ```
//!
//! Angles are folded into [0°, 90°] first, so the pattern is symmetric about
//! boresight and mirrored about the transducer plane. Sectors 1 and 2 are a
//! flat lobe (`A = 1`, no slope).

/// Constant term per sector.
pub const A: [f64; 10] = [
    0.0,
    1.0,
    1.0,
    1.0,
    0.891250938,
    0.707945784,
    0.501187234,
    0.354813389,
    0.251188643,
    0.199526231,
];

/// Linear term per sector.
pub const B: [f64; 10] = [
    0.0,
    0.0,
    0.0,
    -0.00459648054721,
    -0.0155520765675,
    -0.0208114779827,
    -0.0182211227016,
    -0.0122437497109,
    -0.00780345575475,
    -0.00312857467007,
];

/// Quadratic term per sector.
pub const C: [f64; 10] = [
    0.0,
    0.0,
    0.0,
    -0.000787968093807,
    -0.000307591508224,
    -0.000218348633296,
    0.00047738416141,
    0.000120353137658,
    0.000323676257958,
    0.000143850511,
];

/// Cubic term per sector.
pub const D: [f64; 10] = [
    0.0,
    0.0,
    0.0,
    1.60125528528e-05,
    2.9747624976e-06,
    2.31910931569e-05,
    -1.1901034125e-05,
    6.77743734332e-06,
    -5.99548024824e-06,
    -4.79372835035e-06,
];

/// Fold an angle in radians into [0°, 90°].
pub fn fold_degrees(theta: f64) -> f64 {
    let mut deg = (theta * 180.0 / std::f64::consts::PI).abs();
    while deg > 90.0 {
        deg = (180.0 - deg).abs();
    }
    deg
}

/// Normalized directivity gain at `theta` radians off boresight.
///
/// Returns exactly `1.0` at boresight; otherwise the spline value of the
/// sector containing the folded angle.
pub fn gain(theta: f64) -> f64 {
    let deg = fold_degrees(theta);
    let i = (deg / 10.0).ceil() as usize;
    if i == 0 {
        return 1.0;
    }
    let x = deg - (i - 1) as f64 * 10.0;
    // libm pow rather than repeated multiplication, for bit-exact results
    A[i] + B[i] * x + C[i] * x.powf(2.0) + D[i] * x.powf(3.0)
}

/// Directivity gain in dB (`20·log10`).
pub fn gain_db(theta: f64) -> f64 {
    20.0 * gain(theta).log10()
}
