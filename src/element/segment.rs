use crate::element::{ElementType, ReferenceElement};
use crate::quadrature::{convert_rule, univariate, QuadraturePair};
use crate::Real;
use nalgebra::{SVector, Vector1};
use numeric_literals::replace_float_literals;

/// Linear segment on the reference interval `[-1, 1]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Segment2;

impl ReferenceElement<1, 2> for Segment2 {
    const ELEMENT_TYPE: ElementType = ElementType::Segment2;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn reference_nodes<T: Real>() -> [SVector<T, 1>; 2] {
        [Vector1::new(-1.0), Vector1::new(1.0)]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn evaluate_basis<T: Real>(xi: &SVector<T, 1>) -> [T; 2] {
        [(1.0 - xi[0]) / 2.0, (1.0 + xi[0]) / 2.0]
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn gradients<T: Real>(_xi: &SVector<T, 1>) -> [SVector<T, 1>; 2] {
        [Vector1::new(-0.5), Vector1::new(0.5)]
    }

    fn default_quadrature<T: Real>() -> QuadraturePair<T, 1> {
        convert_rule(univariate::gauss(2))
    }
}
