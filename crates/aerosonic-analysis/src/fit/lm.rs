//! Levenberg-Marquardt least-squares solver.
//!
//! Minimizes `‖r(p)‖²` for a residual function `r`. The Jacobian is taken by
//! forward differences with step `√ε·|p_j|`, and the damped normal equations
//!
//! ```text
//! (JᵀJ + μ·diag(JᵀJ)) h = −Jᵀr
//! ```
//!
//! are solved by Cholesky factorization. The damping `μ` is updated from the
//! gain ratio of actual to predicted reduction (Nielsen's rule).
//!
//! Reference: Madsen, Nielsen & Tingleff, "Methods for Non-Linear Least
//! Squares Problems" (2004), §3.2.

use nalgebra::{DMatrix, DVector};

use super::{FitError, FitOptions};

/// Converged solver state.
#[derive(Debug, Clone)]
pub(crate) struct Solution {
    pub params: DVector<f64>,
    pub jacobian: DMatrix<f64>,
    pub cost: f64,
    pub evaluations: usize,
}

struct Counted<F> {
    residual: F,
    evaluations: usize,
}

impl<F> Counted<F>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    fn eval(&mut self, p: &DVector<f64>) -> DVector<f64> {
        self.evaluations += 1;
        (self.residual)(p)
    }

    fn jacobian(&mut self, p: &DVector<f64>, r: &DVector<f64>) -> DMatrix<f64> {
        let sqrt_eps = f64::EPSILON.sqrt();
        let mut jac = DMatrix::zeros(r.len(), p.len());
        for j in 0..p.len() {
            let mut step = sqrt_eps * p[j].abs();
            if step == 0.0 {
                step = sqrt_eps;
            }
            let mut shifted = p.clone();
            shifted[j] += step;
            let column = (self.eval(&shifted) - r) / step;
            jac.set_column(j, &column);
        }
        jac
    }
}

/// Minimize the sum of squared residuals starting from `p0`.
pub(crate) fn minimize<F>(
    residual: F,
    p0: DVector<f64>,
    options: &FitOptions,
    max_evaluations: usize,
) -> Result<Solution, FitError>
where
    F: Fn(&DVector<f64>) -> DVector<f64>,
{
    let mut f = Counted {
        residual,
        evaluations: 0,
    };
    let n = p0.len();
    let mut p = p0;
    let mut r = f.eval(&p);
    let mut cost = r.norm_squared();
    if !cost.is_finite() {
        return Err(FitError::NonFiniteResidual {
            params: p.iter().copied().collect(),
        });
    }

    let mut mu = options.initial_damping;
    let mut nu = 2.0;

    let not_converged = |p: &DVector<f64>, evaluations| FitError::NotConverged {
        params: p.iter().copied().collect(),
        evaluations,
    };

    loop {
        if f.evaluations >= max_evaluations {
            return Err(not_converged(&p, f.evaluations));
        }

        let jac = f.jacobian(&p, &r);
        let gradient = jac.tr_mul(&r);
        let normal = jac.tr_mul(&jac);
        let scale = DVector::from_iterator(n, normal.diagonal().iter().map(|&d| d.max(f64::MIN_POSITIVE)));

        if cost == 0.0 || gradient.amax() == 0.0 {
            return Ok(Solution {
                params: p,
                jacobian: jac,
                cost,
                evaluations: f.evaluations,
            });
        }

        loop {
            let mut damped = normal.clone();
            for j in 0..n {
                damped[(j, j)] += mu * scale[j];
            }

            let Some(chol) = damped.cholesky() else {
                mu *= nu;
                nu *= 2.0;
                if !mu.is_finite() {
                    return Err(not_converged(&p, f.evaluations));
                }
                continue;
            };
            let step = chol.solve(&(-&gradient));

            let candidate = &p + &step;
            let r_new = f.eval(&candidate);
            let cost_new = r_new.norm_squared();

            let predicted = step.dot(&(step.component_mul(&scale) * mu - &gradient));
            let small_step = step.norm() <= options.xtol * (p.norm() + options.xtol);

            if cost_new.is_finite() && cost_new < cost && predicted > 0.0 {
                let rho = (cost - cost_new) / predicted;
                let small_reduction = cost - cost_new <= options.ftol * cost;

                p = candidate;
                r = r_new;
                cost = cost_new;
                mu *= (1.0 / 3.0f64).max(1.0 - (2.0 * rho - 1.0).powi(3));
                nu = 2.0;

                if small_reduction || small_step {
                    let jacobian = f.jacobian(&p, &r);
                    return Ok(Solution {
                        params: p,
                        jacobian,
                        cost,
                        evaluations: f.evaluations,
                    });
                }
                break;
            }

            if small_step {
                return Ok(Solution {
                    params: p,
                    jacobian: jac,
                    cost,
                    evaluations: f.evaluations,
                });
            }

            mu *= nu;
            nu *= 2.0;

            if f.evaluations >= max_evaluations {
                return Err(not_converged(&p, f.evaluations));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_linear_problem() {
        // r = [p0 - 3, 2·p1 + 4]
        let residual = |p: &DVector<f64>| DVector::from_vec(vec![p[0] - 3.0, 2.0 * p[1] + 4.0]);
        let sol = minimize(residual, DVector::from_vec(vec![0.0, 0.0]), &FitOptions::default(), 100)
            .unwrap();
        assert!((sol.params[0] - 3.0).abs() < 1e-8);
        assert!((sol.params[1] + 2.0).abs() < 1e-8);
        assert!(sol.cost < 1e-16);
    }

    #[test]
    fn rosenbrock_converges() {
        let residual =
            |p: &DVector<f64>| DVector::from_vec(vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]]);
        let sol = minimize(residual, DVector::from_vec(vec![-1.2, 1.0]), &FitOptions::default(), 2000)
            .unwrap();
        assert!((sol.params[0] - 1.0).abs() < 1e-6, "{}", sol.params);
        assert!((sol.params[1] - 1.0).abs() < 1e-6, "{}", sol.params);
    }

    #[test]
    fn evaluation_cap_is_reported() {
        let residual =
            |p: &DVector<f64>| DVector::from_vec(vec![10.0 * (p[1] - p[0] * p[0]), 1.0 - p[0]]);
        let err = minimize(residual, DVector::from_vec(vec![-1.2, 1.0]), &FitOptions::default(), 4)
            .unwrap_err();
        match err {
            FitError::NotConverged { params, evaluations } => {
                assert_eq!(params.len(), 2);
                assert!(evaluations >= 4);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_finite_start_is_rejected() {
        let residual = |p: &DVector<f64>| DVector::from_vec(vec![p[0].ln()]);
        let err = minimize(residual, DVector::from_vec(vec![-1.0]), &FitOptions::default(), 10)
            .unwrap_err();
        assert!(matches!(err, FitError::NonFiniteResidual { .. }));
    }
}
