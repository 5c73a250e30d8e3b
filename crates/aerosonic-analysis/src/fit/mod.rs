//! Least-squares fits of the transducer response models.
//!
//! Two fixed models are fitted:
//!
//! - **Power-law sine**: `y = sin(x)^a` or `y = (r·sin(x))^a`. The amplitude of
//!   a transducer driven with duty ratio `D` follows `sin(π·D/(2·255))` in
//!   theory; the fitted exponent captures the measured saturation.
//! - **Plane**: `z = a·x + b·y + d`, used to remove the geometric phase
//!   gradient from a measured phase field before looking at residual
//!   per-transducer error.
//!
//! Each call is independent. Failure to converge within the evaluation
//! budget is reported as [`FitError::NotConverged`] with the last estimate;
//! nothing is retried.

mod lm;

use nalgebra::{DMatrix, DVector};

/// Default evaluation budget of the power-law fits.
pub const DEFAULT_MAX_EVALUATIONS: usize = 2000;

/// Default initial exponent of the power-law fits.
pub const DEFAULT_EXPONENT: f64 = 0.75;

/// Errors raised by curve fitting.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    /// The solver hit its evaluation budget before converging.
    #[error("fit did not converge after {evaluations} evaluations (last estimate {params:?})")]
    NotConverged {
        /// Last parameter estimate.
        params: Vec<f64>,
        /// Number of model evaluations spent.
        evaluations: usize,
    },

    /// Fewer usable samples than parameters.
    #[error("{points} usable samples cannot determine {params} parameters")]
    InsufficientData {
        /// Number of usable samples.
        points: usize,
        /// Number of model parameters.
        params: usize,
    },

    /// Independent and dependent arrays differ in length.
    #[error("sample length mismatch: {x} x values, {y} y values")]
    LengthMismatch {
        /// Length of the independent samples.
        x: usize,
        /// Length of the dependent samples.
        y: usize,
    },

    /// The model is not finite at the initial guess.
    #[error("residuals are not finite at initial guess {params:?}")]
    NonFiniteResidual {
        /// The initial guess.
        params: Vec<f64>,
    },
}

/// Solver tolerances and budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Evaluation budget; `None` uses the per-model default.
    pub max_evaluations: Option<usize>,
    /// Relative reduction of the sum of squares below which the fit stops.
    pub ftol: f64,
    /// Relative step size below which the fit stops.
    pub xtol: f64,
    /// Initial damping factor, relative to the diagonal of `JᵀJ`.
    pub initial_damping: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_evaluations: None,
            ftol: 1.49012e-8,
            xtol: 1.49012e-8,
            initial_damping: 1e-3,
        }
    }
}

impl FitOptions {
    /// Options with an explicit evaluation budget.
    pub fn with_max_evaluations(max_evaluations: usize) -> Self {
        Self {
            max_evaluations: Some(max_evaluations),
            ..Self::default()
        }
    }
}

/// Best-fit parameters and their covariance estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// Fitted parameters, in model order.
    pub params: Vec<f64>,
    /// Covariance of the parameters, scaled by the residual variance.
    /// Entries are infinite when it cannot be estimated.
    pub covariance: DMatrix<f64>,
    /// Sum of squared residuals at the solution.
    pub cost: f64,
    /// Number of model evaluations.
    pub evaluations: usize,
}

impl FitResult {
    /// One-sigma standard errors (square root of the covariance diagonal).
    pub fn std_errors(&self) -> Vec<f64> {
        self.covariance.diagonal().iter().map(|v| v.sqrt()).collect()
    }

    fn from_solution(solution: lm::Solution, points: usize) -> Self {
        let n = solution.params.len();
        let covariance = if points > n {
            let normal = solution.jacobian.tr_mul(&solution.jacobian);
            normal
                .try_inverse()
                .map(|inv| inv * (solution.cost / (points - n) as f64))
                .unwrap_or_else(|| DMatrix::from_element(n, n, f64::INFINITY))
        } else {
            DMatrix::from_element(n, n, f64::INFINITY)
        };
        Self {
            params: solution.params.iter().copied().collect(),
            covariance,
            cost: solution.cost,
            evaluations: solution.evaluations,
        }
    }
}

/// `sin(x)^a`
pub fn sine_power(x: f64, a: f64) -> f64 {
    x.sin().powf(a)
}

/// `(r·sin(x))^a`
pub fn scaled_sine_power(x: f64, r: f64, a: f64) -> f64 {
    (r * x.sin()).powf(a)
}

/// Fit an arbitrary scalar model `y = model(x, p)` to samples.
pub fn curve_fit<M>(
    model: M,
    x: &[f64],
    y: &[f64],
    p0: &[f64],
    options: &FitOptions,
    default_budget: usize,
) -> Result<FitResult, FitError>
where
    M: Fn(f64, &[f64]) -> f64,
{
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.len() < p0.len() {
        return Err(FitError::InsufficientData {
            points: x.len(),
            params: p0.len(),
        });
    }

    let residual = |p: &DVector<f64>| {
        DVector::from_iterator(
            x.len(),
            x.iter()
                .zip(y.iter())
                .map(|(&xi, &yi)| model(xi, p.as_slice()) - yi),
        )
    };
    let budget = options.max_evaluations.unwrap_or(default_budget);
    let solution = lm::minimize(residual, DVector::from_row_slice(p0), options, budget)?;
    Ok(FitResult::from_solution(solution, x.len()))
}

/// Fit `y = sin(x)^a`.
///
/// `initial_exponent` defaults to [`DEFAULT_EXPONENT`] and the budget to
/// [`DEFAULT_MAX_EVALUATIONS`]. `params` of the result is `[a]`.
pub fn fit_sine_power(
    x: &[f64],
    y: &[f64],
    initial_exponent: Option<f64>,
    options: &FitOptions,
) -> Result<FitResult, FitError> {
    let a0 = initial_exponent.unwrap_or(DEFAULT_EXPONENT);
    curve_fit(
        |xi, p| sine_power(xi, p[0]),
        x,
        y,
        &[a0],
        options,
        DEFAULT_MAX_EVALUATIONS,
    )
}

/// Fit `y = (r·sin(x))^a`.
///
/// `initial` is `(r, a)` and defaults to `(1, 0.75)`. `params` of the result
/// is `[r, a]`.
pub fn fit_scaled_sine_power(
    x: &[f64],
    y: &[f64],
    initial: Option<(f64, f64)>,
    options: &FitOptions,
) -> Result<FitResult, FitError> {
    let (r0, a0) = initial.unwrap_or((1.0, DEFAULT_EXPONENT));
    curve_fit(
        |xi, p| scaled_sine_power(xi, p[0], p[1]),
        x,
        y,
        &[r0, a0],
        options,
        DEFAULT_MAX_EVALUATIONS,
    )
}

/// The plane `z = a·x + b·y + d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Gradient along x.
    pub a: f64,
    /// Gradient along y.
    pub b: f64,
    /// Offset.
    pub d: f64,
}

impl Plane {
    /// Height of the plane at `(x, y)`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        self.a * x + self.b * y + self.d
    }

    /// Residual of a sample relative to the plane.
    pub fn detrend(&self, x: f64, y: f64, z: f64) -> f64 {
        z - self.evaluate(x, y)
    }
}

/// Fit a plane to `(x, y, z)` samples.
///
/// Samples whose `z` is `None` or not finite are left out of the fit. The
/// initial guess defaults to `(1, 1, 1)` and the budget to `200·(n + 1)`
/// evaluations.
pub fn fit_plane(
    samples: &[(f64, f64, Option<f64>)],
    initial: Option<Plane>,
    options: &FitOptions,
) -> Result<(Plane, FitResult), FitError> {
    let usable: Vec<(f64, f64, f64)> = samples
        .iter()
        .filter_map(|&(x, y, z)| z.filter(|v| v.is_finite()).map(|z| (x, y, z)))
        .collect();
    if usable.len() < 3 {
        return Err(FitError::InsufficientData {
            points: usable.len(),
            params: 3,
        });
    }

    let p0 = initial.map_or([1.0, 1.0, 1.0], |p| [p.a, p.b, p.d]);
    let residual = |p: &DVector<f64>| {
        DVector::from_iterator(
            usable.len(),
            usable.iter().map(|&(x, y, z)| p[0] * x + p[1] * y + p[2] - z),
        )
    };
    let budget = options.max_evaluations.unwrap_or(200 * (3 + 1));
    let solution = lm::minimize(residual, DVector::from_row_slice(&p0), options, budget)?;
    let result = FitResult::from_solution(solution, usable.len());
    let plane = Plane {
        a: result.params[0],
        b: result.params[1],
        d: result.params[2],
    };
    Ok((plane, result))
}
