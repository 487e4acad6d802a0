//! Basis values and physical gradients of an element at its quadrature points.
use crate::element::{determinant, inverse_with_determinant, reference_jacobian, ElementType, ReferenceElement};
use crate::error::{AssemblyError, GeometryError};
use crate::quadrature::QuadraturePair;
use crate::Real;
use nalgebra::SVector;
use std::marker::PhantomData;

/// Basis data of one element at one quadrature point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointBasis<T: Real, const D: usize, const N: usize> {
    pub weight: T,
    pub values: [T; N],
    /// Basis gradients with respect to physical coordinates.
    pub gradients: [SVector<T, D>; N],
    pub determinant: T,
}

impl<T: Real, const D: usize, const N: usize> PointBasis<T, D, N> {
    /// The integration factor `weight * |J|` of the quadrature point.
    pub fn scale(&self) -> T {
        self.weight * self.determinant
    }
}

/// The reference basis of element `E`, tabulated at the points of a quadrature rule.
///
/// Tabulation happens once per kernel. Evaluating an element only maps the tabulated
/// gradients to physical space and does not allocate.
#[derive(Debug, Clone)]
pub struct ElementQuadratureSpace<T: Real, E, const D: usize, const N: usize> {
    weights: Vec<T>,
    points: Vec<SVector<T, D>>,
    basis_values: Vec<[T; N]>,
    reference_gradients: Vec<[SVector<T, D>; N]>,
    marker: PhantomData<E>,
}

impl<T, E, const D: usize, const N: usize> Default for ElementQuadratureSpace<T, E, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E, const D: usize, const N: usize> ElementQuadratureSpace<T, E, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
{
    /// Tabulates the basis at the element's default quadrature rule.
    pub fn new() -> Self {
        let (weights, points) = E::default_quadrature();
        Self::tabulate(weights, points)
    }

    /// Tabulates the basis at a custom quadrature rule.
    pub fn try_with_quadrature(quadrature: QuadraturePair<T, D>) -> Result<Self, AssemblyError> {
        let (weights, points) = quadrature;
        if weights.len() != points.len() {
            return Err(AssemblyError::SizeMismatch {
                what: "quadrature weights and points",
                expected: points.len(),
                actual: weights.len(),
            });
        }
        Ok(Self::tabulate(weights, points))
    }

    fn tabulate(weights: Vec<T>, points: Vec<SVector<T, D>>) -> Self {
        let basis_values = points.iter().map(E::evaluate_basis).collect();
        let reference_gradients = points.iter().map(E::gradients).collect();
        Self {
            weights,
            points,
            basis_values,
            reference_gradients,
            marker: PhantomData,
        }
    }

    pub fn element_type(&self) -> ElementType {
        E::ELEMENT_TYPE
    }

    pub fn num_quadrature_points(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    pub fn points(&self) -> &[SVector<T, D>] {
        &self.points
    }

    /// Basis values, physical gradients and Jacobian determinant at quadrature point
    /// `quadrature_point` of the element with node coordinates `x`.
    ///
    /// Fails if the determinant of the geometric map is not strictly positive or not finite.
    ///
    /// # Panics
    ///
    /// Panics if the quadrature point index is out of bounds.
    pub fn evaluate(
        &self,
        quadrature_point: usize,
        x: &[SVector<T, D>; N],
    ) -> Result<PointBasis<T, D, N>, GeometryError> {
        let reference_gradients = &self.reference_gradients[quadrature_point];
        let jacobian = reference_jacobian(x, reference_gradients);
        let det = determinant(&jacobian);
        if !(det.is_finite() && det > T::zero()) {
            return Err(GeometryError::new(quadrature_point, det));
        }

        // grad N = J^{-T} grad_xi N
        let inverse_transpose = inverse_with_determinant(&jacobian, det).transpose();
        let gradients = (*reference_gradients).map(|g| inverse_transpose * g);

        Ok(PointBasis {
            weight: self.weights[quadrature_point],
            values: self.basis_values[quadrature_point],
            gradients,
            determinant: det,
        })
    }
}
