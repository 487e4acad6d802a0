use crate::element::{ElementType, ReferenceElement};
use crate::quadrature::{convert_rule, simplex, QuadraturePair, Rule};
use crate::Real;
use nalgebra::{SVector, Vector3};
use numeric_literals::replace_float_literals;

/// Linear tetrahedron with reference vertices (-1, -1, -1), (1, -1, -1), (-1, 1, -1), (-1, -1, 1).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Tet4;

impl ReferenceElement<3, 4> for Tet4 {
    const ELEMENT_TYPE: ElementType = ElementType::Tet4;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes<T: Real>() -> [SVector<T, 3>; 4] {
        [
            Vector3::new(-1.0, -1.0, -1.0),
            Vector3::new(1.0, -1.0, -1.0),
            Vector3::new(-1.0, 1.0, -1.0),
            Vector3::new(-1.0, -1.0, 1.0),
        ]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis<T: Real>(xi: &SVector<T, 3>) -> [T; 4] {
        [
            -0.5 * (1.0 + xi[0] + xi[1] + xi[2]),
            0.5 * (1.0 + xi[0]),
            0.5 * (1.0 + xi[1]),
            0.5 * (1.0 + xi[2]),
        ]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients<T: Real>(_xi: &SVector<T, 3>) -> [SVector<T, 3>; 4] {
        [
            Vector3::new(-0.5, -0.5, -0.5),
            Vector3::new(0.5, 0.0, 0.0),
            Vector3::new(0.0, 0.5, 0.0),
            Vector3::new(0.0, 0.0, 0.5),
        ]
    }

    fn default_quadrature<T: Real>() -> QuadraturePair<T, 3> {
        let rule: Rule<3> = simplex::tetrahedron(2).expect("Degree 2 tetrahedron rule is always available");
        convert_rule(rule)
    }
}
