//! Utility functions for evaluating ICA separations.

use ndarray::{Array1, Array2, ArrayView1};

/// Permute and scale a matrix to be close to identity.
///
/// This is useful for evaluating separation quality when the
/// true mixing matrix is known.
///
/// # Arguments
/// * `a` - Matrix to permute (typically W @ A where W is unmixing and A is mixing)
/// * `scale` - If true, scale rows to have unit diagonal
///
/// # Returns
/// * Permuted (and optionally scaled) matrix
pub fn permute(a: &Array2<f64>, scale: bool) -> Array2<f64> {
    let n = a.nrows();
    let mut a = a.clone();

    // Swap rows until no swap increases the diagonal energy
    let mut done = false;
    while !done {
        done = true;
        for i in 0..n {
            for j in 0..i {
                let diag_sq = a[[i, i]].powi(2) + a[[j, j]].powi(2);
                let off_sq = a[[i, j]].powi(2) + a[[j, i]].powi(2);

                if diag_sq < off_sq {
                    for col in 0..a.ncols() {
                        a.swap([i, col], [j, col]);
                    }
                    done = false;
                }
            }
        }
    }

    if scale {
        for i in 0..n {
            let diag = a[[i, i]];
            if diag.abs() > 1e-10 {
                a.row_mut(i).mapv_inplace(|v| v / diag);
            }
        }
    }

    a
}

/// Compute the Amari distance between two matrices.
///
/// The Amari distance measures how close `W @ A` is to a permutation
/// and scaling matrix. It equals 0 when W perfectly unmixes A.
///
/// # Arguments
/// * `w` - Unmixing matrix
/// * `a` - Mixing matrix
///
/// # Returns
/// * Amari distance (0 = perfect separation)
pub fn amari_distance(w: &Array2<f64>, a: &Array2<f64>) -> f64 {
    let p = w.dot(a);
    let n = p.nrows() as f64;

    let s = |r: &Array2<f64>| -> f64 {
        let mut sum = 0.0;
        for row in r.rows() {
            let row_sum: f64 = row.iter().map(|&x| x * x).sum();
            let row_max: f64 = row.iter().map(|&x| x * x).fold(0.0, f64::max);
            if row_max > 1e-15 {
                sum += row_sum / row_max - 1.0;
            }
        }
        sum
    };

    let p_t = p.t().to_owned();

    (s(&p) + s(&p_t)) / (2.0 * n)
}

/// Pearson correlation between two equally long signals.
pub fn correlation(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let n = a.len() as f64;
    let mean_a = a.sum() / n;
    let mean_b = b.sum() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (&x, &y) in a.iter().zip(b.iter()) {
        cov += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a).powi(2);
        var_b += (y - mean_b).powi(2);
    }

    if var_a <= 0.0 || var_b <= 0.0 {
        return 0.0;
    }
    cov / (var_a * var_b).sqrt()
}

/// For each true source (row of `truth`), the best absolute correlation with
/// any estimated source (row of `estimate`).
///
/// ICA recovers sources only up to permutation, sign and scale, so this is
/// the natural per-source quality score.
pub fn match_sources(truth: &Array2<f64>, estimate: &Array2<f64>) -> Array1<f64> {
    Array1::from_iter(truth.rows().into_iter().map(|source| {
        estimate
            .rows()
            .into_iter()
            .map(|candidate| correlation(source, candidate).abs())
            .fold(0.0, f64::max)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_amari_distance_perfect() {
        // W = A^{-1} should give distance ~0
        let a = array![[2.0, 1.0], [1.0, 1.0]];
        let w = array![[1.0, -1.0], [-1.0, 2.0]];

        let dist = amari_distance(&w, &a);

        assert!(dist < 1e-10, "Amari distance should be ~0, got {}", dist);
    }

    #[test]
    fn test_amari_distance_permutation_and_scale() {
        let a = array![[2.0, 1.0], [1.0, 1.0]];
        // Swapped and rescaled rows of the inverse
        let w = array![[-3.0, 6.0], [0.5, -0.5]];

        let dist = amari_distance(&w, &a);
        assert!(dist < 1e-10, "Amari distance should be ~0, got {}", dist);
    }

    #[test]
    fn test_amari_distance_mixed() {
        let a = Array2::eye(2);
        let w = array![[1.0, 1.0], [1.0, -1.0]];
        assert!(amari_distance(&w, &a) > 0.5);
    }

    #[test]
    fn test_permute() {
        let a = array![[0.1, 0.9], [0.95, 0.05]];

        let p = permute(&a, true);

        // After permutation and scaling, diagonal should be 1
        assert!(
            (p[[0, 0]] - 1.0).abs() < 1e-6,
            "Diagonal should be 1, got {}",
            p[[0, 0]]
        );
        assert!(
            (p[[1, 1]] - 1.0).abs() < 1e-6,
            "Diagonal should be 1, got {}",
            p[[1, 1]]
        );
    }

    #[test]
    fn test_correlation() {
        let a = array![1.0, 2.0, 3.0, 4.0];
        let b = array![-2.0, -4.0, -6.0, -8.0];
        assert_abs_diff_eq!(correlation(a.view(), b.view()), -1.0, epsilon = 1e-12);
        let flat = array![1.0, 1.0, 1.0, 1.0];
        assert_eq!(correlation(a.view(), flat.view()), 0.0);
    }

    #[test]
    fn test_match_sources_ignores_order_and_sign() {
        let truth = array![[1.0, 2.0, 3.0, 1.0], [0.0, 1.0, 0.0, -1.0]];
        let estimate = array![[0.0, -2.0, 0.0, 2.0], [3.0, 6.0, 9.0, 3.0]];
        let scores = match_sources(&truth, &estimate);
        assert_abs_diff_eq!(scores[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(scores[1], 1.0, epsilon = 1e-12);
    }
}
