// src/whitening.rs

//! Data preprocessing: centering and whitening.

use crate::error::{FastIcaError, Result};
use crate::math::inv_sqrt_psd;
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Result of whitening transformation.
#[derive(Debug, Clone)]
pub struct WhiteningResult {
    /// Whitened data matrix (n_features × n_samples).
    pub data: Array2<f64>,
    /// Whitening matrix `E · D^{-1/2} · Eᵀ` (n_features × n_features).
    pub whitening_matrix: Array2<f64>,
    /// Inverse of the whitening matrix, `E · D^{1/2} · Eᵀ`.
    pub dewhitening_matrix: Array2<f64>,
    /// Eigenvalues of the sample covariance.
    pub eigenvalues: Array1<f64>,
}

/// Center the data by subtracting the mean observation from every column.
///
/// # Arguments
/// * `x` - Data matrix of shape (n_features, n_samples)
///
/// # Returns
/// * Tuple of (centered_data, mean_vector)
pub fn center(x: ArrayView2<'_, f64>) -> (Array2<f64>, Array1<f64>) {
    let n = x.ncols().max(1) as f64;
    let mean = x.sum_axis(Axis(1)) / n;

    let mut centered = x.to_owned();
    for mut column in centered.columns_mut() {
        column -= &mean;
    }

    (centered, mean)
}

/// Sample covariance `X · Xᵀ / (n − 1)` of already centered data.
pub fn covariance(x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    let n_samples = x.ncols();
    if n_samples < 2 {
        return Err(FastIcaError::InvalidDimensions {
            message: format!("covariance needs at least 2 samples, got {}", n_samples),
        });
    }
    Ok(x.dot(&x.t()) / (n_samples - 1) as f64)
}

/// Whiten centered data through the eigendecomposition of its covariance.
///
/// Whitening transforms the data so that it has unit variance and
/// the components are uncorrelated.
///
/// # Arguments
/// * `x` - Centered data matrix of shape (n_features, n_samples)
///
/// # Returns
/// * `WhiteningResult` containing whitened data and the whitening transform
///
/// # Errors
/// * `DegenerateCovariance` when the covariance is not positive definite,
///   e.g. fewer samples than features or linearly dependent rows.
pub fn whiten(x: ArrayView2<'_, f64>) -> Result<WhiteningResult> {
    let cov = covariance(x)?;

    let (k, eigenvalues, eigenvectors) = inv_sqrt_psd(cov.view(), "sample covariance")?;

    let s_sqrt = eigenvalues.mapv(f64::sqrt);
    let dewhitening = (&eigenvectors * &s_sqrt).dot(&eigenvectors.t());

    let whitened = k.dot(&x);

    Ok(WhiteningResult {
        data: whitened,
        whitening_matrix: k,
        dewhitening_matrix: dewhitening,
        eigenvalues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, StandardNormal};

    fn correlated_data(n: usize, seed: u64) -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let z = Array2::from_shape_fn((3, n), |_| StandardNormal.sample(&mut rng));
        let mix = array![[2.0, 0.3, 0.0], [0.5, 1.0, 0.2], [0.1, -0.4, 0.7]];
        mix.dot(&z) + 5.0
    }

    #[test]
    fn test_center() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let (centered, mean) = center(x.view());

        assert!((mean[0] - 2.0).abs() < 1e-10);
        assert!((mean[1] - 5.0).abs() < 1e-10);

        // Centered data should have zero mean
        for row in centered.rows() {
            assert!(row.sum().abs() < 1e-10);
        }

        // Input untouched
        assert_eq!(x[[0, 0]], 1.0);
    }

    #[test]
    fn test_whitening_matrix_inverts_covariance() {
        let x = correlated_data(2000, 1);
        let (centered, _) = center(x.view());
        let cov = covariance(centered.view()).unwrap();
        let result = whiten(centered.view()).unwrap();

        let k = &result.whitening_matrix;
        let product = k.dot(&cov).dot(&k.t());
        let frobenius = (&product - &Array2::<f64>::eye(3))
            .iter()
            .map(|v| v * v)
            .sum::<f64>()
            .sqrt();
        assert!(frobenius < 1e-6, "||K C Kᵀ - I|| = {}", frobenius);
    }

    #[test]
    fn test_whitened_data_has_unit_covariance() {
        let x = correlated_data(1500, 2);
        let (centered, _) = center(x.view());
        let result = whiten(centered.view()).unwrap();

        assert_eq!(result.data.dim(), (3, 1500));
        let cov = covariance(result.data.view()).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(cov[[i, j]], expected, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_dewhitening_is_inverse() {
        let x = correlated_data(500, 3);
        let (centered, _) = center(x.view());
        let result = whiten(centered.view()).unwrap();

        let product = result.dewhitening_matrix.dot(&result.whitening_matrix);
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[[i, j]], expected, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_fewer_samples_than_features_is_degenerate() {
        let mut rng = StdRng::seed_from_u64(4);
        let x = Array2::from_shape_fn((5, 2), |_| StandardNormal.sample(&mut rng));
        let (centered, _) = center(x.view());

        let err = whiten(centered.view()).unwrap_err();
        assert!(matches!(err, FastIcaError::DegenerateCovariance { .. }), "{}", err);
    }

    #[test]
    fn test_duplicate_rows_are_degenerate() {
        let x = array![[1.0, 2.0, 3.0, 5.0], [1.0, 2.0, 3.0, 5.0]];
        let (centered, _) = center(x.view());
        assert!(matches!(
            whiten(centered.view()),
            Err(FastIcaError::DegenerateCovariance { .. })
        ));
    }

    #[test]
    fn test_single_sample_rejected() {
        let x = array![[1.0], [2.0]];
        assert!(matches!(
            whiten(x.view()),
            Err(FastIcaError::InvalidDimensions { .. })
        ));
    }
}
