//! Least squares solver.
//!
//! The regression here is tiny (a handful to a few dozen billing cycles,
//! three columns), so we solve it with an SVD:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! - The design matrix is tall (more rows than columns); nalgebra's
//!   `QR::solve` is meant for square systems, SVD handles the tall case.
//! - Singular values below the tolerance are treated as zero. If that leaves
//!   the system rank deficient the solution is rejected rather than returned
//!   as a minimum-norm guess.

use nalgebra::{DMatrix, DVector};

/// Relative singular value cutoff (scaled by the largest singular value).
const RANK_TOL: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the design matrix is rank deficient or the solve
/// produced non-finite coefficients.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() < x.ncols() || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    if !(s_max.is_finite() && s_max > 0.0) {
        return None;
    }

    let eps = RANK_TOL * s_max;
    if svd.rank(eps) < x.ncols() {
        return None;
    }

    let beta = svd.solve(y, eps).ok()?;
    if beta.iter().all(|v| v.is_finite()) {
        Some(beta)
    } else {
        None
    }
}
