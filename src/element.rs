//! Reference elements and the geometric map from reference to physical coordinates.
use crate::quadrature::QuadraturePair;
use crate::Real;
use nalgebra::{SMatrix, SVector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

mod hexahedron;
mod quadrilateral;
mod segment;
mod tetrahedron;
mod triangle;

pub use hexahedron::Hex8;
pub use quadrilateral::Quad4;
pub use segment::Segment2;
pub use tetrahedron::Tet4;
pub use triangle::Tri3;

/// Runtime tag of a reference element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Segment2,
    Tri3,
    Quad4,
    Tet4,
    Hex8,
}

impl ElementType {
    pub const ALL: [ElementType; 5] = [Self::Segment2, Self::Tri3, Self::Quad4, Self::Tet4, Self::Hex8];

    pub fn reference_dim(&self) -> usize {
        match self {
            Self::Segment2 => 1,
            Self::Tri3 | Self::Quad4 => 2,
            Self::Tet4 | Self::Hex8 => 3,
        }
    }

    pub fn num_nodes(&self) -> usize {
        match self {
            Self::Segment2 => 2,
            Self::Tri3 => 3,
            Self::Quad4 | Self::Tet4 => 4,
            Self::Hex8 => 8,
        }
    }

    /// The number of points of the default quadrature rule of the element.
    pub fn num_quadrature_points(&self) -> usize {
        match self {
            Self::Segment2 => 2,
            Self::Tri3 => 3,
            Self::Quad4 | Self::Tet4 => 4,
            Self::Hex8 => 8,
        }
    }
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

/// The number of points of the default quadrature rule for the given element type.
pub fn num_quadrature_points(element_type: ElementType) -> usize {
    element_type.num_quadrature_points()
}

/// A Lagrange reference element with `N` nodes in `D` reference dimensions.
///
/// Implementors are zero-sized markers. All data is computed by associated functions, so that
/// kernels can be specialized on the element without storing it.
pub trait ReferenceElement<const D: usize, const N: usize>: Copy + Debug + Default + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    /// Coordinates of the nodes in the reference domain.
    fn reference_nodes<T: Real>() -> [SVector<T, D>; N];

    /// Basis function values at the reference coordinates `xi`.
    fn evaluate_basis<T: Real>(xi: &SVector<T, D>) -> [T; N];

    /// Gradients of the basis functions with respect to the reference coordinates.
    fn gradients<T: Real>(xi: &SVector<T, D>) -> [SVector<T, D>; N];

    /// The default quadrature rule, whose size is given by [`ElementType::num_quadrature_points`].
    fn default_quadrature<T: Real>() -> QuadraturePair<T, D>;
}

/// Computes the Jacobian `dx/dxi = sum_a x_a (grad N_a)^T` of the geometric map.
pub fn reference_jacobian<T: Real, const D: usize, const N: usize>(
    x: &[SVector<T, D>; N],
    reference_gradients: &[SVector<T, D>; N],
) -> SMatrix<T, D, D> {
    x.iter()
        .zip(reference_gradients)
        .fold(SMatrix::zeros(), |j, (x_a, g_a)| j + x_a * g_a.transpose())
}

/// Closed-form determinant of a matrix of dimension 1, 2 or 3.
///
/// # Panics
///
/// Panics for dimensions larger than 3.
pub fn determinant<T: Real, const D: usize>(j: &SMatrix<T, D, D>) -> T {
    match D {
        1 => j[(0, 0)],
        2 => j[(0, 0)] * j[(1, 1)] - j[(0, 1)] * j[(1, 0)],
        3 => {
            j[(0, 0)] * (j[(1, 1)] * j[(2, 2)] - j[(1, 2)] * j[(2, 1)])
                - j[(0, 1)] * (j[(1, 0)] * j[(2, 2)] - j[(1, 2)] * j[(2, 0)])
                + j[(0, 2)] * (j[(1, 0)] * j[(2, 1)] - j[(1, 1)] * j[(2, 0)])
        }
        _ => panic!("Closed-form determinant is only available for dimensions 1 to 3"),
    }
}

/// Closed-form inverse of a matrix of dimension 1, 2 or 3 with the given non-zero determinant.
///
/// # Panics
///
/// Panics for dimensions larger than 3.
pub fn inverse_with_determinant<T: Real, const D: usize>(j: &SMatrix<T, D, D>, det: T) -> SMatrix<T, D, D> {
    let mut inverse = SMatrix::zeros();
    match D {
        1 => inverse[(0, 0)] = T::one() / det,
        2 => {
            inverse[(0, 0)] = j[(1, 1)] / det;
            inverse[(0, 1)] = -j[(0, 1)] / det;
            inverse[(1, 0)] = -j[(1, 0)] / det;
            inverse[(1, 1)] = j[(0, 0)] / det;
        }
        3 => {
            // Transposed cofactor matrix
            for r in 0..3 {
                for c in 0..3 {
                    let (r1, r2) = ((c + 1) % 3, (c + 2) % 3);
                    let (c1, c2) = ((r + 1) % 3, (r + 2) % 3);
                    inverse[(r, c)] = (j[(r1, c1)] * j[(r2, c2)] - j[(r1, c2)] * j[(r2, c1)]) / det;
                }
            }
        }
        _ => panic!("Closed-form inverse is only available for dimensions 1 to 3"),
    }
    inverse
}

/// Maps reference coordinates to physical coordinates.
pub fn map_reference_coords<E, T, const D: usize, const N: usize>(x: &[SVector<T, D>; N], xi: &SVector<T, D>) -> SVector<T, D>
where
    T: Real,
    E: ReferenceElement<D, N>,
{
    E::evaluate_basis(xi)
        .iter()
        .zip(x)
        .fold(SVector::zeros(), |acc, (&n_a, x_a)| acc + x_a * n_a)
}

/// Basis functions of the tensor-product element whose nodes sit at the given sign vectors.
fn tensor_basis<T: Real, const D: usize, const N: usize>(signs: &[[f64; D]; N], xi: &SVector<T, D>) -> [T; N] {
    let scale: T = nalgebra::convert(2f64.powi(D as i32));
    std::array::from_fn(|a| {
        let product = (0..D).fold(T::one(), |p, k| {
            let s: T = nalgebra::convert(signs[a][k]);
            p * (T::one() + s * xi[k])
        });
        product / scale
    })
}

fn tensor_gradients<T: Real, const D: usize, const N: usize>(
    signs: &[[f64; D]; N],
    xi: &SVector<T, D>,
) -> [SVector<T, D>; N] {
    let scale: T = nalgebra::convert(2f64.powi(D as i32));
    std::array::from_fn(|a| {
        SVector::from_fn(|k, _| {
            (0..D).fold(T::one(), |p, m| {
                let s: T = nalgebra::convert(signs[a][m]);
                if m == k {
                    p * s
                } else {
                    p * (T::one() + s * xi[m])
                }
            }) / scale
        })
    })
}

fn nodes_from_signs<T: Real, const D: usize, const N: usize>(signs: &[[f64; D]; N]) -> [SVector<T, D>; N] {
    std::array::from_fn(|a| SVector::from(signs[a].map(nalgebra::convert::<f64, T>)))
}
