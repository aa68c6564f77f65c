// src/symmetric.rs

//! Symmetric (parallel) FastICA: all components are updated together.

use crate::config::IterationBudget;
use crate::contrast::ContrastFunction;
use crate::error::{FastIcaError, Result};
use crate::math::sym_decorrelation;
use crate::random::random_unit_columns;
use crate::solver::SolverOutput;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use tracing::{debug, trace};

/// `1 − min_i |(Wᵀ · W_old)_ii|`.
///
/// Zero when every column is parallel or anti-parallel to its previous value.
pub(crate) fn min_abs_diag_gap(w: &Array2<f64>, w_old: &Array2<f64>) -> f64 {
    let c = w.t().dot(w_old);
    let min_abs_diag = c.diag().iter().fold(f64::INFINITY, |m, v| m.min(v.abs()));
    1.0 - min_abs_diag
}

/// One fixed-point step: `w_j ← scale_j · w_j + E[g(w_jᵀx) · x]` for every column.
fn update<C>(w: &Array2<f64>, x: ArrayView2<'_, f64>, contrast: &C) -> Array2<f64>
where
    C: ContrastFunction + ?Sized,
{
    let (first_deriv, scales) = contrast.evaluate_columns(w.view(), x);
    w * &scales + &first_deriv
}

/// Run symmetric FastICA on whitened data `x` (n_features × n_samples).
///
/// Returns a square matrix with the unmixing vectors as columns.
pub(crate) fn solve<C, R>(
    x: ArrayView2<'_, f64>,
    contrast: &C,
    budget: &IterationBudget,
    w_init: Option<&Array2<f64>>,
    rng: &mut R,
) -> Result<SolverOutput>
where
    C: ContrastFunction + ?Sized,
    R: Rng + ?Sized,
{
    let d = x.nrows();

    debug!(components = d, contrast = contrast.name(), "symmetric FastICA");

    let w0 = match w_init {
        Some(w) => w.clone(),
        None => random_unit_columns(d, d, rng),
    };
    let mut w = sym_decorrelation(&w0)?;
    let mut gap = f64::INFINITY;

    for iter in 0..budget.max_iter {
        budget.check_deadline(iter)?;

        let w_old = w;
        w = sym_decorrelation(&update(&w_old, x, contrast))?;

        gap = min_abs_diag_gap(&w, &w_old);
        trace!(iteration = iter, gap, "symmetric update");

        if gap < budget.tol {
            debug!(iterations = iter + 1, "symmetric FastICA converged");
            return Ok(SolverOutput {
                unmixing: w,
                iterations: vec![iter + 1],
            });
        }
    }

    Err(FastIcaError::NotConverged {
        iterations: budget.max_iter,
        delta: gap,
        tolerance: budget.tol,
        component: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::{ContrastType, Kurtosis};
    use crate::math::orthonormality_error;
    use crate::solver::tests::whitened_mixture;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_gap_ignores_sign_flips() {
        let w = array![[1.0, 0.0], [0.0, 1.0]];
        let flipped = array![[-1.0, 0.0], [0.0, 1.0]];
        assert_abs_diff_eq!(min_abs_diag_gap(&w, &flipped), 0.0, epsilon = 1e-15);

        let swapped = array![[0.0, 1.0], [1.0, 0.0]];
        assert_abs_diff_eq!(min_abs_diag_gap(&w, &swapped), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_symmetric_gives_orthonormal_columns() {
        let x = whitened_mixture(3, 3000, 42);
        let mut rng = StdRng::seed_from_u64(1);
        let budget = IterationBudget::new(500, 1e-4);

        for contrast in [ContrastType::logcosh(), ContrastType::exp(), ContrastType::kurtosis()] {
            let out = solve(x.view(), &contrast, &budget, None, &mut rng).unwrap();
            assert_eq!(out.unmixing.dim(), (3, 3));
            assert_eq!(out.iterations.len(), 1);
            assert!(
                orthonormality_error(&out.unmixing) < 1e-8,
                "{} columns not orthonormal",
                contrast
            );
        }
    }

    #[test]
    fn test_symmetric_cap_is_reported() {
        let x = whitened_mixture(3, 1000, 5);
        let budget = IterationBudget::new(1, 1e-12);
        let err = solve(x.view(), &Kurtosis, &budget, None, &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(
            err,
            FastIcaError::NotConverged { component: None, iterations: 1, .. }
        ));
    }

    #[test]
    fn test_rank_deficient_initial_guess() {
        let x = whitened_mixture(2, 500, 3);
        let budget = IterationBudget::new(100, 1e-4);
        let w_init = array![[1.0, 1.0], [1.0, 1.0]];
        let err = solve(x.view(), &Kurtosis, &budget, Some(&w_init), &mut StdRng::seed_from_u64(0)).unwrap_err();
        assert!(matches!(err, FastIcaError::DegenerateCovariance { .. }));
    }
}
