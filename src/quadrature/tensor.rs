//! Rules for quadrilaterals and hexahedra formed as tensor products of 1D Gauss rules.
use crate::quadrature::univariate::gauss;
use crate::quadrature::Rule;

/// A Gauss quadrature rule for the reference quadrilateral `[-1, 1]^2`.
///
/// The first coordinate varies fastest.
pub fn quadrilateral_gauss(num_points_per_dim: usize) -> Rule<2> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let rule1d = || weights1d.iter().zip(&points1d);

    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (&wy, &[y]) in rule1d() {
        for (&wx, &[x]) in rule1d() {
            weights.push(wx * wy);
            points.push([x, y]);
        }
    }
    (weights, points)
}

/// A Gauss quadrature rule for the reference hexahedron `[-1, 1]^3`.
///
/// The first coordinate varies fastest.
pub fn hexahedron_gauss(num_points_per_dim: usize) -> Rule<3> {
    let (weights1d, points1d) = gauss(num_points_per_dim);
    let rule1d = || weights1d.iter().zip(&points1d);

    let mut weights = Vec::new();
    let mut points = Vec::new();
    for (&wz, &[z]) in rule1d() {
        for (&wy, &[y]) in rule1d() {
            for (&wx, &[x]) in rule1d() {
                weights.push(wx * wy * wz);
                points.push([x, y, z]);
            }
        }
    }
    (weights, points)
}
