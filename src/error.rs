// src/error.rs

//! Error types for the FastICA crate.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during FastICA computation.
#[derive(Debug, Clone, Error)]
pub enum FastIcaError {
    /// A fixed-point iteration did not converge within the maximum number of iterations.
    #[error(
        "FastICA did not converge after {iterations} iterations{}. \
         Final change: {delta:.4e}, requested tolerance: {tolerance:.4e}. \
         Consider increasing max_iter or tolerance.",
        component_suffix(.component)
    )]
    NotConverged {
        /// Number of iterations performed.
        iterations: usize,
        /// Convergence measure at the last iteration.
        delta: f64,
        /// Requested tolerance.
        tolerance: f64,
        /// Component being estimated (deflation only).
        component: Option<usize>,
    },

    /// The configured wall-clock budget ran out between two iterations.
    #[error("FastICA exceeded its time budget after {iterations} iterations ({elapsed:?} elapsed)")]
    DeadlineExceeded {
        /// Time spent when the check fired.
        elapsed: Duration,
        /// Number of iterations completed so far.
        iterations: usize,
    },

    /// An eigendecomposition produced a non-positive eigenvalue.
    ///
    /// For whitening this means the covariance is rank deficient (for example
    /// fewer samples than dimensions, or duplicated rows). For symmetric
    /// decorrelation it means the candidate matrix lost column rank.
    #[error("Degenerate {context}: eigenvalue {eigenvalue:.4e} is not positive")]
    DegenerateCovariance {
        /// Which matrix was being decomposed.
        context: String,
        /// The offending eigenvalue.
        eigenvalue: f64,
    },

    /// Input dimensions are invalid.
    #[error("Invalid dimensions: {message}")]
    InvalidDimensions {
        /// Description of the dimension error.
        message: String,
    },

    /// General computation error.
    #[error("Computation error: {message}")]
    ComputationError {
        /// Description of what went wrong.
        message: String,
    },

    /// Invalid configuration parameter.
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Name of the invalid parameter.
        parameter: String,
        /// Description of why it's invalid.
        message: String,
    },

    /// A matrix file could not be opened, read or written.
    #[error("I/O error on {path}: {message}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error message.
        message: String,
    },

    /// A matrix file contained a malformed record.
    #[error("Parse error in {path} at record {record}: {message}")]
    Parse {
        /// File involved.
        path: String,
        /// One-based record number.
        record: usize,
        /// What was wrong with it.
        message: String,
    },
}

fn component_suffix(component: &Option<usize>) -> String {
    match component {
        Some(k) => format!(" on component {}", k),
        None => String::new(),
    }
}

/// Convenience type alias for Results with FastIcaError.
pub type Result<T> = std::result::Result<T, FastIcaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_converged_mentions_component() {
        let err = FastIcaError::NotConverged {
            iterations: 10,
            delta: 0.5,
            tolerance: 1e-4,
            component: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 10 iterations on component 2"), "{}", msg);

        let err = FastIcaError::NotConverged {
            iterations: 10,
            delta: 0.5,
            tolerance: 1e-4,
            component: None,
        };
        assert!(!err.to_string().contains("component"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = FastIcaError::InvalidConfig {
            parameter: "contrast".into(),
            message: "unknown contrast function 'gauss'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'contrast': unknown contrast function 'gauss'"
        );
    }
}
