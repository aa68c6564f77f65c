// src/random.rs

//! Random initialization helpers.
//!
//! Every function takes the generator explicitly so that concurrent fits
//! with independent generators stay reproducible.

use crate::error::{FastIcaError, Result};
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use std::f64::consts::PI;

/// Draw a uniform sample from (0, 1], so that `ln` is always finite.
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    1.0 - rng.random::<f64>()
}

/// Generate a uniformly distributed random unit vector of length `d`.
///
/// Coordinates are produced in pairs with the Box-Muller transform. When `d`
/// is odd the last coordinate takes one more pair of uniform draws and keeps
/// only the cosine branch. The result is scaled to unit Euclidean norm.
pub fn random_unit_vector<R: Rng + ?Sized>(d: usize, rng: &mut R) -> Array1<f64> {
    let mut v = Array1::zeros(d);

    let mut i = 0;
    while i + 1 < d {
        let radius = (-2.0 * open_unit(rng).ln()).sqrt();
        let angle = 2.0 * PI * rng.random::<f64>();
        v[i] = radius * angle.cos();
        v[i + 1] = radius * angle.sin();
        i += 2;
    }

    if d % 2 == 1 {
        let radius = (-2.0 * open_unit(rng).ln()).sqrt();
        let angle = 2.0 * PI * rng.random::<f64>();
        v[d - 1] = radius * angle.cos();
    }

    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v /= norm;
    }
    v
}

/// Build a `d × k` matrix whose columns are independent random unit vectors.
pub fn random_unit_columns<R: Rng + ?Sized>(d: usize, k: usize, rng: &mut R) -> Array2<f64> {
    let mut w = Array2::zeros((d, k));
    for mut column in w.columns_mut() {
        column.assign(&random_unit_vector(d, rng));
    }
    w
}

/// Select a random subset of `0..n`, keeping each index with probability `fraction`.
///
/// Indices are returned in increasing order.
pub fn select_samples<R: Rng + ?Sized>(n: usize, fraction: f64, rng: &mut R) -> Result<Vec<usize>> {
    let coin = Bernoulli::new(fraction).map_err(|e| FastIcaError::InvalidConfig {
        parameter: "sample_fraction".into(),
        message: e.to_string(),
    })?;

    Ok((0..n).filter(|_| coin.sample(&mut *rng)).collect())
}
