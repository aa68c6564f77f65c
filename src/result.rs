//! Result types for the FastICA algorithm.

use crate::config::Strategy;
use ndarray::{Array1, Array2};

/// Result of running the FastICA algorithm.
#[derive(Debug, Clone)]
pub struct FastIcaResult {
    /// Whitening matrix K (n_features × n_features).
    pub whitening: Array2<f64>,

    /// Inverse of the whitening matrix.
    pub dewhitening: Array2<f64>,

    /// Unmixing matrix W in whitened space (n_components × n_components).
    /// Each row is one unmixing vector; rows are orthonormal.
    pub unmixing: Array2<f64>,

    /// Whitened data (n_features × n_samples).
    pub whitened: Array2<f64>,

    /// Estimated independent sources (n_components × n_samples).
    pub sources: Array2<f64>,

    /// Mean of input features (n_features,).
    pub mean: Array1<f64>,

    /// Strategy that produced the unmixing matrix.
    pub strategy: Strategy,

    /// Iterations used. One entry per component for deflation,
    /// a single entry for symmetric estimation.
    pub iterations: Vec<usize>,
}

impl FastIcaResult {
    /// Get the full unmixing matrix that transforms centered data to sources.
    ///
    /// This is `W @ K`.
    pub fn full_unmixing(&self) -> Array2<f64> {
        self.unmixing.dot(&self.whitening)
    }

    /// Get the mixing matrix (inverse of the full unmixing).
    ///
    /// This transforms sources back to the original feature space. Since W is
    /// orthogonal its inverse is its transpose, so the result is `K⁻¹ @ Wᵀ`.
    pub fn mixing(&self) -> Array2<f64> {
        self.dewhitening.dot(&self.unmixing.t())
    }

    /// Total number of fixed-point iterations across all components.
    pub fn total_iterations(&self) -> usize {
        self.iterations.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use crate::solver::tests::generate_test_data;
    use crate::{FastIca, FastIcaConfig};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mixing_inverts_full_unmixing() {
        let (_, _, x) = generate_test_data(3, 2000, 10);
        let config = FastIcaConfig::builder().random_state(1).build();
        let result = FastIca::fit_with_config(&x, &config).unwrap();

        let product = result.mixing().dot(&result.full_unmixing());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[[i, j]], expected, epsilon = 1e-8);
            }
        }
    }

    #[test]
    fn test_sources_reconstruct_centered_data() {
        let (_, _, x) = generate_test_data(2, 500, 11);
        let config = FastIcaConfig::builder().random_state(2).build();
        let result = FastIca::fit_with_config(&x, &config).unwrap();

        let rebuilt = result.mixing().dot(&result.sources);
        for i in 0..2 {
            for j in 0..500 {
                assert_abs_diff_eq!(rebuilt[[i, j]] + result.mean[i], x[[i, j]], epsilon = 1e-8);
            }
        }
    }
}
