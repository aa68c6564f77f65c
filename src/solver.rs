// src/solver.rs

//! Main FastICA solver interface.

use crate::config::{FastIcaConfig, Strategy};
use crate::deflation;
use crate::error::{FastIcaError, Result};
use crate::random::select_samples;
use crate::result::FastIcaResult;
use crate::symmetric;
use crate::whitening::{center, whiten};

use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// Output of a solver run in whitened space.
#[derive(Debug, Clone)]
pub(crate) struct SolverOutput {
    /// Unmixing vectors as columns (n_components × n_components).
    pub unmixing: Array2<f64>,
    /// Iterations used: one entry per component for deflation, one in total
    /// for symmetric estimation.
    pub iterations: Vec<usize>,
}

/// The FastICA Independent Component Analysis solver.
///
/// This struct provides static methods for fitting ICA models.
pub struct FastIca;

impl FastIca {
    /// Fit ICA model with default configuration.
    ///
    /// # Arguments
    /// * `x` - Data matrix of shape (n_features, n_samples)
    ///
    /// # Returns
    /// * `FastIcaResult` containing unmixing matrix, sources, etc.
    pub fn fit(x: &Array2<f64>) -> Result<FastIcaResult> {
        Self::fit_with_config(x, &FastIcaConfig::default())
    }

    /// Fit ICA model with custom configuration.
    ///
    /// Centers and whitens `x`, runs the configured solver in whitened space
    /// and maps the result back.
    ///
    /// # Arguments
    /// * `x` - Data matrix of shape (n_features, n_samples)
    /// * `config` - Algorithm configuration
    ///
    /// # Returns
    /// * `FastIcaResult` containing unmixing matrix, sources, etc.
    pub fn fit_with_config(x: &Array2<f64>, config: &FastIcaConfig) -> Result<FastIcaResult> {
        config.validate()?;

        let (n, p) = (x.nrows(), x.ncols());

        if n == 0 || p == 0 {
            return Err(FastIcaError::InvalidDimensions {
                message: "Input matrix cannot be empty".into(),
            });
        }

        if x.iter().any(|v| !v.is_finite()) {
            return Err(FastIcaError::InvalidDimensions {
                message: "Input matrix contains NaN or infinite values".into(),
            });
        }

        if let Some(ref w) = config.w_init {
            if w.dim() != (n, n) {
                return Err(FastIcaError::InvalidConfig {
                    parameter: "w_init".into(),
                    message: format!(
                        "shape {:?} doesn't match expected ({}, {})",
                        w.shape(),
                        n,
                        n
                    ),
                });
            }
        }

        if p < n {
            warn!(
                n_features = n,
                n_samples = p,
                "fewer samples than features; the covariance will be singular"
            );
        }

        // Initialize RNG
        let mut rng = match config.random_state {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        info!(n_features = n, n_samples = p, "centering");
        let (centered, mean) = center(x.view());

        info!("whitening");
        let whitening = whiten(centered.view())?;

        let training = match config.sample_fraction {
            Some(fraction) if fraction < 1.0 => {
                let indices = select_samples(p, fraction, &mut rng)?;
                if indices.len() < 2 {
                    return Err(FastIcaError::InvalidDimensions {
                        message: format!(
                            "sample_fraction {} selected only {} of {} samples",
                            fraction,
                            indices.len(),
                            p
                        ),
                    });
                }
                debug!(selected = indices.len(), total = p, "fitting on a sample subset");
                whitening.data.select(Axis(1), &indices)
            }
            _ => whitening.data.clone(),
        };

        let output = run_solver(training.view(), config, &mut rng)?;

        // Rows of the result are the unmixing vectors.
        let unmixing = output.unmixing.t().to_owned();
        let sources = unmixing.dot(&whitening.data);

        info!(
            strategy = %config.strategy,
            contrast = %config.contrast,
            iterations = output.iterations.iter().sum::<usize>(),
            "FastICA converged"
        );

        Ok(FastIcaResult {
            whitening: whitening.whitening_matrix,
            dewhitening: whitening.dewhitening_matrix,
            unmixing,
            whitened: whitening.data,
            sources,
            mean,
            strategy: config.strategy,
            iterations: output.iterations,
        })
    }

    /// Transform new data using a fitted model.
    ///
    /// # Arguments
    /// * `x` - New data matrix (n_features, n_samples)
    /// * `result` - Result from a previous fit
    ///
    /// # Returns
    /// * Estimated sources (n_components, n_samples)
    pub fn transform(x: &Array2<f64>, result: &FastIcaResult) -> Result<Array2<f64>> {
        if x.nrows() != result.mean.len() {
            return Err(FastIcaError::InvalidDimensions {
                message: format!(
                    "model was fitted on {} features, got {}",
                    result.mean.len(),
                    x.nrows()
                ),
            });
        }

        let mut x = x.clone();
        for mut column in x.columns_mut() {
            column -= &result.mean;
        }

        // Apply full unmixing
        let w = result.full_unmixing();
        Ok(w.dot(&x))
    }
}

/// Dispatch to the configured estimation strategy.
fn run_solver(
    x: ArrayView2<'_, f64>,
    config: &FastIcaConfig,
    rng: &mut StdRng,
) -> Result<SolverOutput> {
    let budget = config.budget();
    let w_init = config.w_init.as_ref();

    match config.strategy {
        Strategy::Deflation => deflation::solve(x, &config.contrast, &budget, w_init, rng),
        Strategy::Symmetric => symmetric::solve(x, &config.contrast, &budget, w_init, rng),
    }
}
