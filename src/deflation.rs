// src/deflation.rs

//! Deflation FastICA: components are estimated one after another.
//!
//! Each new vector is kept orthogonal to the ones already fixed with a
//! Gram-Schmidt step after every update.

use crate::config::IterationBudget;
use crate::contrast::ContrastFunction;
use crate::error::{FastIcaError, Result};
use crate::random::random_unit_vector;
use crate::solver::SolverOutput;
use ndarray::{s, Array1, Array2, ArrayView2};
use rand::Rng;
use tracing::{debug, trace};

/// Scale `w` to unit length.
fn normalize(w: &mut Array1<f64>) -> Result<()> {
    let norm = w.iter().map(|v| v * v).sum::<f64>().sqrt();
    if !(norm > 0.0) || !norm.is_finite() {
        return Err(FastIcaError::ComputationError {
            message: format!("cannot normalize vector with norm {}", norm),
        });
    }
    *w /= norm;
    Ok(())
}

/// `min(‖a − b‖², ‖a + b‖²)`: distance between two directions ignoring sign.
pub(crate) fn sign_invariant_distance(a: &Array1<f64>, b: &Array1<f64>) -> f64 {
    let minus = (a - b).mapv(|v| v * v).sum();
    let plus = (a + b).mapv(|v| v * v).sum();
    minus.min(plus)
}

/// Run deflation FastICA on whitened data `x` (n_features × n_samples).
///
/// Returns a square matrix whose column `k` is the k-th unmixing vector.
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
    let mut fixed_subspace = Array2::zeros((d, d));
    let mut iterations = Vec::with_capacity(d);
    let mut spent = 0;

    debug!(components = d, contrast = contrast.name(), "deflation FastICA");

    for k in 0..d {
        let start = match w_init {
            Some(w) => {
                let mut v = w.column(k).to_owned();
                normalize(&mut v)?;
                v
            }
            None => random_unit_vector(d, rng),
        };

        let (w, n_iter) = estimate_component(
            x,
            contrast,
            fixed_subspace.slice(s![.., ..k]),
            start,
            budget,
            k,
            spent,
        )?;

        debug!(component = k, iterations = n_iter, "component converged");
        fixed_subspace.column_mut(k).assign(&w);
        iterations.push(n_iter);
        spent += n_iter;
    }

    Ok(SolverOutput {
        unmixing: fixed_subspace,
        iterations,
    })
}

/// Fixed-point iteration for one unmixing vector.
fn estimate_component<C>(
    x: ArrayView2<'_, f64>,
    contrast: &C,
    fixed: ArrayView2<'_, f64>,
    start: Array1<f64>,
    budget: &IterationBudget,
    component: usize,
    spent: usize,
) -> Result<(Array1<f64>, usize)>
where
    C: ContrastFunction + ?Sized,
{
    let mut w = start;
    // The first comparison is against zero, so iteration 0 never converges.
    let mut w_old = Array1::zeros(w.len());
    let mut delta = f64::INFINITY;

    for iter in 0..budget.max_iter {
        budget.check_deadline(spent + iter)?;

        let (first_deriv, scale) = contrast.evaluate(w.view(), x);
        let mut next = &w * scale + &first_deriv;
        normalize(&mut next)?;

        for fixed_w in fixed.columns() {
            let projection = fixed_w.dot(&next);
            next.scaled_add(-projection, &fixed_w);
        }
        normalize(&mut next)?;

        delta = sign_invariant_distance(&w_old, &next);
        trace!(component, iteration = iter, delta, scale, "deflation update");

        if delta < budget.tol {
            return Ok((next, iter + 1));
        }

        w_old = next.clone();
        w = next;
    }

    Err(FastIcaError::NotConverged {
        iterations: budget.max_iter,
        delta,
        tolerance: budget.tol,
        component: Some(component),
    })
}
