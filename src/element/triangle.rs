use crate::element::{ElementType, ReferenceElement};
use crate::quadrature::{convert_rule, simplex, QuadraturePair, Rule};
use crate::Real;
use nalgebra::{SVector, Vector2};
use numeric_literals::replace_float_literals;

/// Linear triangle with reference vertices (-1, -1), (1, -1), (-1, 1).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tri3;

impl ReferenceElement<2, 3> for Tri3 {
    const ELEMENT_TYPE: ElementType = ElementType::Tri3;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes<T: Real>() -> [SVector<T, 2>; 3] {
        [Vector2::new(-1.0, -1.0), Vector2::new(1.0, -1.0), Vector2::new(-1.0, 1.0)]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis<T: Real>(xi: &SVector<T, 2>) -> [T; 3] {
        [-0.5 * (xi[0] + xi[1]), 0.5 * (1.0 + xi[0]), 0.5 * (1.0 + xi[1])]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients<T: Real>(_xi: &SVector<T, 2>) -> [SVector<T, 2>; 3] {
        [Vector2::new(-0.5, -0.5), Vector2::new(0.5, 0.0), Vector2::new(0.0, 0.5)]
    }

    fn default_quadrature<T: Real>() -> QuadraturePair<T, 2> {
        let rule: Rule<2> = simplex::triangle(2).expect("Degree 2 triangle rule is always available");
        convert_rule(rule)
    }
}
