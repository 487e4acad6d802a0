use crate::element::{nodes_from_signs, tensor_basis, tensor_gradients, ElementType, ReferenceElement};
use crate::quadrature::{convert_rule, tensor, QuadraturePair};
use crate::Real;
use nalgebra::SVector;

/// Bilinear quadrilateral on the reference square `[-1, 1]^2`, nodes in counter-clockwise order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Quad4;

#[rustfmt::skip]
const QUAD4_NODE_SIGNS: [[f64; 2]; 4] = [
    [-1.0, -1.0],
    [ 1.0, -1.0],
    [ 1.0,  1.0],
    [-1.0,  1.0],
];

impl ReferenceElement<2, 4> for Quad4 {
    const ELEMENT_TYPE: ElementType = ElementType::Quad4;

    fn reference_nodes<T: Real>() -> [SVector<T, 2>; 4] {
        nodes_from_signs(&QUAD4_NODE_SIGNS)
    }

    fn evaluate_basis<T: Real>(xi: &SVector<T, 2>) -> [T; 4] {
        // N_{alpha, beta}(xi) = (1 + alpha xi_0) (1 + beta xi_1) / 4
        tensor_basis(&QUAD4_NODE_SIGNS, xi)
    }

    fn gradients<T: Real>(xi: &SVector<T, 2>) -> [SVector<T, 2>; 4] {
        tensor_gradients(&QUAD4_NODE_SIGNS, xi)
    }

    fn default_quadrature<T: Real>() -> QuadraturePair<T, 2> {
        convert_rule(tensor::quadrilateral_gauss(2))
    }
}
