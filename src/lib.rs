// src/lib.rs

//! # FastICA
//!
//! Independent Component Analysis with the FastICA fixed-point algorithm.
//!
//! This crate implements the algorithm from:
//!
//! > Aapo Hyvärinen.
//! > "Fast and Robust Fixed-Point Algorithms for Independent Component Analysis"
//! > IEEE Transactions on Neural Networks, 1999
//!
//! Data is centered and whitened, then unmixing vectors are estimated either
//! one at a time (deflation) or all together (symmetric decorrelation), with
//! a pluggable contrast function driving the fixed-point update.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fastica::{ContrastType, FastIca, FastIcaConfig, Strategy};
//! use ndarray::Array2;
//!
//! # fn main() -> Result<(), fastica::FastIcaError> {
//! // Observations (n_features x n_samples)
//! let x = Array2::<f64>::zeros((4, 1000));
//!
//! // Fit ICA with default settings
//! let result = FastIca::fit(&x)?;
//!
//! // Or with custom configuration
//! let config = FastIcaConfig::builder()
//!     .contrast(ContrastType::kurtosis())
//!     .strategy(Strategy::Deflation)
//!     .max_iter(500)
//!     .random_state(42)
//!     .build();
//! let result = FastIca::fit_with_config(&x, &config)?;
//!
//! // Access results
//! let sources = &result.sources;
//! let unmixing = result.full_unmixing();
//! # Ok(())
//! # }
//! ```

mod config;
mod contrast;
mod deflation;
mod error;
mod math;
mod result;
mod solver;
mod symmetric;
mod whitening;

pub mod io;
pub mod random;

pub use config::{ConfigBuilder, FastIcaConfig, Strategy};
pub use contrast::{ContrastFunction, ContrastType, Exponential, Kurtosis, LogCosh};
pub use error::{FastIcaError, Result};
pub use math::{orthonormality_error, sym_decorrelation};
pub use result::FastIcaResult;
pub use solver::FastIca;
pub use whitening::{center, covariance, whiten, WhiteningResult};

// Utility functions
pub mod utils;

// Re-export ndarray for convenience
pub use ndarray;
