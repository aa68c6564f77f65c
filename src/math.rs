// src/math.rs

//! Linear algebra kernels: symmetric eigendecomposition and symmetric decorrelation.

use crate::error::{FastIcaError, Result};
use faer::{Mat, Side};
use ndarray::{Array1, Array2, ArrayView2};

/// Eigenvalues at or below this fraction of the largest one count as zero.
pub const EIGENVALUE_TOLERANCE: f64 = 1e-10;

/// Eigendecomposition of a symmetric matrix.
///
/// Returns `(eigenvalues, eigenvectors)` with eigenvectors stored as columns.
pub fn eigh(a: ArrayView2<'_, f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(FastIcaError::InvalidDimensions {
            message: format!("eigh expects a square matrix, got {}x{}", n, a.ncols()),
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(FastIcaError::ComputationError {
            message: "matrix passed to eigh contains non-finite entries".into(),
        });
    }

    let m = Mat::<f64>::from_fn(n, n, |i, j| a[[i, j]]);
    let eig = m
        .as_ref()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| FastIcaError::ComputationError {
            message: format!("symmetric eigendecomposition failed: {:?}", e),
        })?;

    let diag = eig.S();
    let vectors = eig.U();
    let eigenvalues = Array1::from_shape_fn(diag.dim(), |i| diag[i]);
    let eigenvectors = Array2::from_shape_fn((n, n), |(i, j)| vectors[(i, j)]);

    Ok((eigenvalues, eigenvectors))
}

/// Inverse square root of a symmetric positive-definite matrix: `E · diag(1/√λ) · Eᵀ`.
///
/// Also returns the eigenvalues so callers can build the matching square root.
/// `context` names the matrix in the error raised when an eigenvalue is not
/// positive.
pub fn inv_sqrt_psd(a: ArrayView2<'_, f64>, context: &str) -> Result<(Array2<f64>, Array1<f64>, Array2<f64>)> {
    let (eigenvalues, eigenvectors) = eigh(a)?;
    check_positive(&eigenvalues, context)?;

    let s_inv_sqrt = eigenvalues.mapv(|v| 1.0 / v.sqrt());
    let scaled = &eigenvectors * &s_inv_sqrt;
    let result = scaled.dot(&eigenvectors.t());

    Ok((result, eigenvalues, eigenvectors))
}

fn check_positive(eigenvalues: &Array1<f64>, context: &str) -> Result<()> {
    let max_eigenvalue = eigenvalues.iter().cloned().fold(0.0, f64::max);
    let min_eigenvalue = eigenvalues.iter().cloned().fold(f64::INFINITY, f64::min);
    // Relative to the spectrum, so rescaling the data never changes the verdict.
    let threshold = EIGENVALUE_TOLERANCE * max_eigenvalue;

    if !(max_eigenvalue > 0.0 && max_eigenvalue.is_finite()) || !(min_eigenvalue > threshold) {
        return Err(FastIcaError::DegenerateCovariance {
            context: context.to_string(),
            eigenvalue: min_eigenvalue,
        });
    }
    Ok(())
}

/// Symmetric decorrelation: W <- W · (Wᵀ · W)^{-1/2}
///
/// Returns the matrix with orthonormal columns closest to `w` in Frobenius
/// norm. Fails with `DegenerateCovariance` when `w` is not of full column rank.
pub fn sym_decorrelation(w: &Array2<f64>) -> Result<Array2<f64>> {
    let gram = w.t().dot(w);
    let (correction, _, _) = inv_sqrt_psd(gram.view(), "Gram matrix in symmetric decorrelation")?;
    Ok(w.dot(&correction))
}

/// Largest absolute entry of `Wᵀ·W − I`.
pub fn orthonormality_error(w: &Array2<f64>) -> f64 {
    let gram = w.t().dot(w);
    gram.indexed_iter()
        .map(|((i, j), &v)| if i == j { (v - 1.0).abs() } else { v.abs() })
        .fold(0.0, f64::max)
}
