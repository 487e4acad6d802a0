use crate::element::{nodes_from_signs, tensor_basis, tensor_gradients, ElementType, ReferenceElement};
use crate::quadrature::{convert_rule, tensor, QuadraturePair};
use crate::Real;
use nalgebra::SVector;

/// Trilinear hexahedron on the reference cube `[-1, 1]^3`.
///
/// Nodes 0-3 form the bottom face (z = -1) in counter-clockwise order when viewed from above,
/// nodes 4-7 the top face in the same order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Hex8;

#[rustfmt::skip]
const HEX8_NODE_SIGNS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
];

impl ReferenceElement<3, 8> for Hex8 {
    const ELEMENT_TYPE: ElementType = ElementType::Hex8;

    fn reference_nodes<T: Real>() -> [SVector<T, 3>; 8] {
        nodes_from_signs(&HEX8_NODE_SIGNS)
    }

    fn evaluate_basis<T: Real>(xi: &SVector<T, 3>) -> [T; 8] {
        tensor_basis(&HEX8_NODE_SIGNS, xi)
    }

    fn gradients<T: Real>(xi: &SVector<T, 3>) -> [SVector<T, 3>; 8] {
        tensor_gradients(&HEX8_NODE_SIGNS, xi)
    }

    fn default_quadrature<T: Real>() -> QuadraturePair<T, 3> {
        convert_rule(tensor::hexahedron_gauss(2))
    }
}
