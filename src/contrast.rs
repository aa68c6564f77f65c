// src/contrast.rs

//! Contrast functions for FastICA.
//!
//! A contrast function G measures non-Gaussianity of a projection `u = wᵀx`.
//! The fixed-point update only needs two statistics derived from it:
//!
//! * the first-derivative term `E[g(wᵀx) · x]`, with `g = G'`;
//! * the second-derivative scale, which equals `−E[g'(wᵀx)]`.
//!
//! The update is then `w ← scale · w + E[g(wᵀx) · x]`.

use crate::error::{FastIcaError, Result};
use ndarray::{Array, Array1, Array2, ArrayView1, ArrayView2, Axis, Dimension};
use std::fmt;
use std::str::FromStr;

/// Projection arrays with at least this many entries are mapped on the rayon pool.
pub const PARALLEL_MIN_ELEMENTS: usize = 1 << 14;

/// Apply `f` to every element, in parallel for large arrays.
fn map_inplace<D, F>(a: &mut Array<f64, D>, f: F)
where
    D: Dimension,
    F: Fn(f64) -> f64 + Sync + Send,
{
    if a.len() >= PARALLEL_MIN_ELEMENTS {
        a.par_mapv_inplace(f);
    } else {
        a.mapv_inplace(f);
    }
}

/// Trait for contrast functions used in the fixed-point update.
///
/// Implementors provide the scalar non-linearity `g` and the per-sample
/// summand whose mean is the second-derivative scale. The vector and matrix
/// evaluations are derived from those two functions.
pub trait ContrastFunction: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Non-linearity `g(u)` applied to a projection.
    fn score(&self, u: f64) -> f64;

    /// Per-sample term whose sample mean gives the second-derivative scale.
    fn scale_summand(&self, u: f64) -> f64;

    /// Second-derivative scale when it does not depend on the data.
    fn constant_scale(&self) -> Option<f64> {
        None
    }

    /// Compute `(first_derivative, second_derivative_scale)` for one vector `w`
    /// against whitened data `x` (n_features × n_samples).
    fn evaluate(&self, w: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> (Array1<f64>, f64) {
        let n = x.ncols() as f64;
        let mut projections = x.t().dot(&w);

        let scale = match self.constant_scale() {
            Some(c) => c,
            None => projections.iter().map(|&u| self.scale_summand(u)).sum::<f64>() / n,
        };

        map_inplace(&mut projections, |u| self.score(u));
        let first = x.dot(&projections) / n;

        (first, scale)
    }

    /// Per-column version of [`evaluate`](Self::evaluate): column `j` of the
    /// returned matrix and entry `j` of the returned vector belong to column
    /// `j` of `w`.
    fn evaluate_columns(
        &self,
        w: ArrayView2<'_, f64>,
        x: ArrayView2<'_, f64>,
    ) -> (Array2<f64>, Array1<f64>) {
        let n = x.ncols() as f64;
        let mut projections = x.t().dot(&w);

        let scales = match self.constant_scale() {
            Some(c) => Array1::from_elem(w.ncols(), c),
            None => {
                let mut summands = projections.clone();
                map_inplace(&mut summands, |u| self.scale_summand(u));
                summands.sum_axis(Axis(0)) / n
            }
        };

        map_inplace(&mut projections, |u| self.score(u));
        let first = x.dot(&projections) / n;

        (first, scales)
    }

    /// First-derivative term `E[g(wᵀx) · x]`.
    fn first_derivative(&self, w: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.evaluate(w, x).0
    }

    /// Second-derivative scale `−E[g'(wᵀx)]`.
    fn second_derivative_scale(&self, w: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> f64 {
        match self.constant_scale() {
            Some(c) => c,
            None => {
                let projections = x.t().dot(&w);
                projections.iter().map(|&u| self.scale_summand(u)).sum::<f64>() / x.ncols() as f64
            }
        }
    }

    /// First-derivative terms for every column of `w`.
    fn first_derivative_columns(&self, w: ArrayView2<'_, f64>, x: ArrayView2<'_, f64>) -> Array2<f64> {
        self.evaluate_columns(w, x).0
    }

    /// Second-derivative scales for every column of `w`.
    fn second_derivative_scales(&self, w: ArrayView2<'_, f64>, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.evaluate_columns(w, x).1
    }
}

/// Log-cosh contrast, `G(u) = log cosh(αu) / α`.
///
/// General purpose; the usual default.
#[derive(Clone, Debug)]
pub struct LogCosh {
    /// Slope parameter (default: 1.0).
    pub alpha: f64,
}

impl Default for LogCosh {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl LogCosh {
    /// Create a new LogCosh contrast with the given slope.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }
}

impl ContrastFunction for LogCosh {
    fn name(&self) -> &'static str {
        "logcosh"
    }

    fn score(&self, u: f64) -> f64 {
        (self.alpha * u).tanh()
    }

    fn scale_summand(&self, u: f64) -> f64 {
        let t = (self.alpha * u).tanh();
        self.alpha * (t * t - 1.0)
    }
}

/// Gaussian-kernel contrast, `G(u) = −exp(−u²/2)`.
///
/// Robust when sources are highly super-Gaussian.
#[derive(Clone, Debug, Default)]
pub struct Exponential;

impl Exponential {
    /// Create a new Exponential contrast.
    pub fn new() -> Self {
        Self
    }
}

impl ContrastFunction for Exponential {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn score(&self, u: f64) -> f64 {
        u * (-u * u / 2.0).exp()
    }

    fn scale_summand(&self, u: f64) -> f64 {
        (-u * u / 2.0).exp() * (u * u - 1.0)
    }
}

/// Kurtosis contrast, `G(u) = u⁴/4`.
///
/// On whitened data `E[3u²] = 3`, so the scale is the constant −3.
#[derive(Clone, Debug, Default)]
pub struct Kurtosis;

impl Kurtosis {
    /// Create a new Kurtosis contrast.
    pub fn new() -> Self {
        Self
    }
}

impl ContrastFunction for Kurtosis {
    fn name(&self) -> &'static str {
        "kurtosis"
    }

    fn score(&self, u: f64) -> f64 {
        u * u * u
    }

    fn scale_summand(&self, _u: f64) -> f64 {
        -3.0
    }

    fn constant_scale(&self) -> Option<f64> {
        Some(-3.0)
    }
}

/// Enumeration of built-in contrast functions.
///
/// This allows selecting a contrast without type parameters.
#[derive(Clone, Debug)]
pub enum ContrastType {
    /// Log-cosh contrast.
    LogCosh(LogCosh),
    /// Exponential contrast.
    Exponential(Exponential),
    /// Kurtosis contrast.
    Kurtosis(Kurtosis),
}

impl Default for ContrastType {
    fn default() -> Self {
        ContrastType::LogCosh(LogCosh::default())
    }
}

impl ContrastType {
    /// Log-cosh with slope 1.
    pub fn logcosh() -> Self {
        ContrastType::LogCosh(LogCosh::default())
    }

    /// Log-cosh with a custom slope.
    pub fn logcosh_with_alpha(alpha: f64) -> Self {
        ContrastType::LogCosh(LogCosh::new(alpha))
    }

    /// Exponential contrast.
    pub fn exp() -> Self {
        ContrastType::Exponential(Exponential::new())
    }

    /// Kurtosis contrast.
    pub fn kurtosis() -> Self {
        ContrastType::Kurtosis(Kurtosis::new())
    }

    fn inner(&self) -> &dyn ContrastFunction {
        match self {
            ContrastType::LogCosh(c) => c,
            ContrastType::Exponential(c) => c,
            ContrastType::Kurtosis(c) => c,
        }
    }
}

impl ContrastFunction for ContrastType {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn score(&self, u: f64) -> f64 {
        self.inner().score(u)
    }

    fn scale_summand(&self, u: f64) -> f64 {
        self.inner().scale_summand(u)
    }

    fn constant_scale(&self) -> Option<f64> {
        self.inner().constant_scale()
    }

    fn evaluate(&self, w: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> (Array1<f64>, f64) {
        self.inner().evaluate(w, x)
    }

    fn evaluate_columns(
        &self,
        w: ArrayView2<'_, f64>,
        x: ArrayView2<'_, f64>,
    ) -> (Array2<f64>, Array1<f64>) {
        self.inner().evaluate_columns(w, x)
    }
}

impl fmt::Display for ContrastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContrastType {
    type Err = FastIcaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "logcosh" | "tanh" => Ok(ContrastType::logcosh()),
            "exp" | "exponential" | "gauss" => Ok(ContrastType::exp()),
            "kurtosis" | "pow3" | "cube" => Ok(ContrastType::kurtosis()),
            other => Err(FastIcaError::InvalidConfig {
                parameter: "contrast".into(),
                message: format!(
                    "unknown contrast function '{}' (expected logcosh, exp or kurtosis)",
                    other
                ),
            }),
        }
    }
}
