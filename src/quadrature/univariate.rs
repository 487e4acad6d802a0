//! Gauss-Legendre rules on the reference interval `[-1, 1]`.
use crate::quadrature::Rule;
use nalgebra::{DMatrix, SymmetricEigen};

const MAX_NEWTON_ITERATIONS: usize = 16;

/// The Legendre polynomial `P_n(x)` and its derivative, from the three-term recurrence.
///
/// The derivative is only defined in the open interval (-1, 1).
fn legendre(n: usize, x: f64) -> (f64, f64) {
    // k P_k(x) = (2k - 1) x P_{k - 1}(x) - (k - 1) P_{k - 2}(x)
    let (mut p, mut p_prev) = (1.0, 0.0);
    for k in 1..=n {
        let k = k as f64;
        (p, p_prev) = (((2.0 * k - 1.0) * x * p - (k - 1.0) * p_prev) / k, p);
    }
    let dp = n as f64 * (x * p - p_prev) / (x * x - 1.0);
    (p, dp)
}

/// Approximate roots of `P_n` in ascending order, as the eigenvalues of the symmetric
/// tridiagonal Jacobi matrix of the Legendre recurrence.
fn jacobi_matrix_roots(n: usize) -> Vec<f64> {
    let mut jacobi = DMatrix::zeros(n, n);
    for k in 1..n {
        let k_f = k as f64;
        let beta = k_f / (4.0 * k_f * k_f - 1.0).sqrt();
        jacobi[(k - 1, k)] = beta;
        jacobi[(k, k - 1)] = beta;
    }
    let mut roots: Vec<f64> = SymmetricEigen::new(jacobi).eigenvalues.iter().copied().collect();
    roots.sort_by(f64::total_cmp);
    roots
}

/// Gauss-Legendre quadrature for the reference interval [-1, 1].
///
/// Given `n` points, the rule integrates polynomials of degree up to `2 n - 1` exactly.
/// Points are returned in ascending order and are exactly symmetric about the origin.
///
/// # Panics
///
/// Panics if zero points are requested.
pub fn gauss(num_points: usize) -> Rule<1> {
    let n = num_points;
    assert!(n > 0, "number of points must be positive");

    let roots = jacobi_matrix_roots(n);
    let mut weights = vec![0.0; n];
    let mut points = vec![[0.0]; n];
    // Refine the non-negative half and mirror it
    for i in n / 2..n {
        let is_middle = 2 * i + 1 == n;
        let mut x = if is_middle { 0.0 } else { roots[i] };
        if !is_middle {
            for _ in 0..MAX_NEWTON_ITERATIONS {
                let (p, dp) = legendre(n, x);
                let dx = -p / dp;
                x += dx;
                if dx.abs() <= 1e-15 {
                    break;
                }
            }
        }
        let (_, dp) = legendre(n, x);
        let w = 2.0 / ((1.0 - x * x) * dp * dp);
        points[i] = [x];
        weights[i] = w;
        points[n - 1 - i] = [-x];
        weights[n - 1 - i] = w;
    }

    (weights, points)
}
