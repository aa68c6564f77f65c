// src/config.rs

//! Configuration for the FastICA algorithm.

use crate::contrast::ContrastType;
use crate::error::{FastIcaError, Result};
use ndarray::Array2;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How unmixing vectors are estimated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// One component at a time, each kept orthogonal to the ones already found.
    Deflation,
    /// All components together, re-orthogonalized after every update.
    #[default]
    Symmetric,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Deflation => f.write_str("deflation"),
            Strategy::Symmetric => f.write_str("symmetric"),
        }
    }
}

impl FromStr for Strategy {
    type Err = FastIcaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deflation" | "defl" => Ok(Strategy::Deflation),
            "symmetric" | "parallel" => Ok(Strategy::Symmetric),
            other => Err(FastIcaError::InvalidConfig {
                parameter: "strategy".into(),
                message: format!(
                    "unknown solver strategy '{}' (expected deflation or symmetric)",
                    other
                ),
            }),
        }
    }
}

/// Configuration parameters for the FastICA algorithm.
#[derive(Clone, Debug)]
pub struct FastIcaConfig {
    /// Contrast function driving the fixed-point update.
    pub contrast: ContrastType,

    /// Deflation or symmetric estimation.
    pub strategy: Strategy,

    /// Maximum number of iterations (per component for deflation).
    pub max_iter: usize,

    /// Convergence tolerance.
    pub tol: f64,

    /// Optional wall-clock budget for the whole solve.
    pub timeout: Option<Duration>,

    /// Initial unmixing matrix in whitened space, one vector per column.
    /// If None, uses random initialization.
    pub w_init: Option<Array2<f64>>,

    /// If set, the solver only sees a random subset of the samples,
    /// each kept with this probability.
    pub sample_fraction: Option<f64>,

    /// Random seed for reproducibility.
    pub random_state: Option<u64>,
}

impl Default for FastIcaConfig {
    fn default() -> Self {
        Self {
            contrast: ContrastType::default(),
            strategy: Strategy::default(),
            max_iter: 200,
            tol: 1e-4,
            timeout: None,
            w_init: None,
            sample_fraction: None,
            random_state: None,
        }
    }
}

impl FastIcaConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(FastIcaError::InvalidConfig {
                parameter: "max_iter".into(),
                message: "must be greater than 0".into(),
            });
        }

        if !(self.tol > 0.0) || !self.tol.is_finite() {
            return Err(FastIcaError::InvalidConfig {
                parameter: "tol".into(),
                message: "must be positive".into(),
            });
        }

        if let ContrastType::LogCosh(ref c) = self.contrast {
            if !(1.0..=2.0).contains(&c.alpha) {
                return Err(FastIcaError::InvalidConfig {
                    parameter: "alpha".into(),
                    message: format!("log-cosh slope must lie in [1, 2], got {}", c.alpha),
                });
            }
        }

        if let Some(fraction) = self.sample_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(FastIcaError::InvalidConfig {
                    parameter: "sample_fraction".into(),
                    message: format!("must lie in (0, 1], got {}", fraction),
                });
            }
        }

        if let Some(ref w) = self.w_init {
            if w.nrows() != w.ncols() {
                return Err(FastIcaError::InvalidConfig {
                    parameter: "w_init".into(),
                    message: format!("must be square, got {}x{}", w.nrows(), w.ncols()),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn budget(&self) -> IterationBudget {
        IterationBudget {
            max_iter: self.max_iter,
            tol: self.tol,
            started: Instant::now(),
            timeout: self.timeout,
        }
    }
}

/// Stopping rules shared by both solvers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct IterationBudget {
    pub max_iter: usize,
    pub tol: f64,
    started: Instant,
    timeout: Option<Duration>,
}

impl IterationBudget {
    #[cfg(test)]
    pub fn new(max_iter: usize, tol: f64) -> Self {
        Self {
            max_iter,
            tol,
            started: Instant::now(),
            timeout: None,
        }
    }

    /// Fails once the wall-clock budget is spent. Called between iterations.
    pub fn check_deadline(&self, iterations: usize) -> Result<()> {
        if let Some(timeout) = self.timeout {
            let elapsed = self.started.elapsed();
            if elapsed >= timeout {
                return Err(FastIcaError::DeadlineExceeded { elapsed, iterations });
            }
        }
        Ok(())
    }
}

/// Builder for constructing `FastIcaConfig` with a fluent API.
#[derive(Default)]
pub struct ConfigBuilder {
    config: FastIcaConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: FastIcaConfig::default(),
        }
    }

    /// Set the contrast function.
    pub fn contrast(mut self, contrast: ContrastType) -> Self {
        self.config.contrast = contrast;
        self
    }

    /// Set the estimation strategy.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the maximum number of iterations.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.config.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    pub fn tol(mut self, tol: f64) -> Self {
        self.config.tol = tol;
        self
    }

    /// Set a wall-clock budget for the solve.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the initial unmixing matrix (columns are the starting vectors).
    pub fn w_init(mut self, w_init: Array2<f64>) -> Self {
        self.config.w_init = Some(w_init);
        self
    }

    /// Fit on a random subset of the samples.
    pub fn sample_fraction(mut self, fraction: f64) -> Self {
        self.config.sample_fraction = Some(fraction);
        self
    }

    /// Set the random seed.
    pub fn random_state(mut self, seed: u64) -> Self {
        self.config.random_state = Some(seed);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> FastIcaConfig {
        self.config
    }

    /// Build and validate the configuration.
    pub fn build_validated(self) -> Result<FastIcaConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
