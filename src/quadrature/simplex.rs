//! Rules for the reference triangle and tetrahedron.
//!
//! The reference triangle has vertices (-1, -1), (1, -1), (-1, 1) and area 2.
//! The reference tetrahedron has vertices (-1, -1, -1), (1, -1, -1), (-1, 1, -1), (-1, -1, 1)
//! and volume 4/3.
use crate::quadrature::{QuadratureError, Rule};

/// A rule for the reference triangle that integrates polynomials up to the given total
/// degree exactly.
pub fn triangle(strength: usize) -> Result<Rule<2>, QuadratureError> {
    match strength {
        0 | 1 => Ok((vec![2.0], vec![[-1.0 / 3.0, -1.0 / 3.0]])),
        2 => {
            let a = -2.0 / 3.0;
            let b = 1.0 / 3.0;
            let w = 2.0 / 3.0;
            Ok((vec![w, w, w], vec![[a, a], [b, a], [a, b]]))
        }
        _ => Err(QuadratureError::NoRuleAvailable),
    }
}

/// A rule for the reference tetrahedron that integrates polynomials up to the given total
/// degree exactly.
pub fn tetrahedron(strength: usize) -> Result<Rule<3>, QuadratureError> {
    match strength {
        0 | 1 => Ok((vec![4.0 / 3.0], vec![[-0.5, -0.5, -0.5]])),
        2 => {
            // Barycentric coordinates (a, b, b, b) and permutations, mapped from the unit
            // tetrahedron by x -> 2x - 1
            let a = 2.0 * 0.585_410_196_624_968_5 - 1.0;
            let b = 2.0 * 0.138_196_601_125_010_5 - 1.0;
            let w = 1.0 / 3.0;
            Ok((
                vec![w, w, w, w],
                vec![[b, b, b], [a, b, b], [b, a, b], [b, b, a]],
            ))
        }
        _ => Err(QuadratureError::NoRuleAvailable),
    }
}
