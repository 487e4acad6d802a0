//! Material laws evaluated at quadrature points.
//!
//! A material law receives the element and quadrature point indices together with the local
//! state, and returns the response and its derivative, or a [`ConstitutiveError`]. Laws never
//! substitute a default value for a failed update.
use crate::error::{to_f64, ConstitutiveError};
use crate::Real;
use nalgebra::{SMatrix, SVector};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

/// Response of a diffusion law `q(u, grad u)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DiffusionResponse<T: Real, const D: usize> {
    pub flux: SVector<T, D>,
    /// Derivative of the flux with respect to the gradient of the field.
    pub flux_gradient_derivative: SMatrix<T, D, D>,
    /// Derivative of the flux with respect to the field value.
    pub flux_value_derivative: SVector<T, D>,
}

pub trait DiffusionLaw<T: Real, const D: usize>: Sync {
    fn update(
        &self,
        element: usize,
        quadrature_point: usize,
        u: T,
        grad_u: &SVector<T, D>,
    ) -> Result<DiffusionResponse<T, D>, ConstitutiveError>;
}

/// Fourier's law `q = k grad u` with constant conductivity `k`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstantConductivity<T> {
    pub conductivity: T,
}

impl<T: Real, const D: usize> DiffusionLaw<T, D> for ConstantConductivity<T> {
    fn update(
        &self,
        _element: usize,
        _quadrature_point: usize,
        _u: T,
        grad_u: &SVector<T, D>,
    ) -> Result<DiffusionResponse<T, D>, ConstitutiveError> {
        let k = self.conductivity;
        if !(k > T::zero()) {
            return Err(ConstitutiveError::NonPositiveConductivity { conductivity: to_f64(k) });
        }
        Ok(DiffusionResponse {
            flux: grad_u * k,
            flux_gradient_derivative: SMatrix::identity() * k,
            flux_value_derivative: SVector::zeros(),
        })
    }
}

/// Fourier's law with conductivity `k(u) = k0 (1 + beta u)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemperatureDependentConductivity<T> {
    pub reference_conductivity: T,
    pub coefficient: T,
}

impl<T: Real, const D: usize> DiffusionLaw<T, D> for TemperatureDependentConductivity<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn update(
        &self,
        _element: usize,
        _quadrature_point: usize,
        u: T,
        grad_u: &SVector<T, D>,
    ) -> Result<DiffusionResponse<T, D>, ConstitutiveError> {
        let k0 = self.reference_conductivity;
        let beta = self.coefficient;
        let k = k0 * (1.0 + beta * u);
        if !k.is_finite() {
            return Err(ConstitutiveError::NonFiniteResponse);
        }
        if k <= 0.0 {
            return Err(ConstitutiveError::NonPositiveConductivity { conductivity: to_f64(k) });
        }
        Ok(DiffusionResponse {
            flux: grad_u * k,
            flux_gradient_derivative: SMatrix::identity() * k,
            flux_value_derivative: grad_u * (k0 * beta),
        })
    }
}

/// Lamé parameters of an isotropic material.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LameParameters<T> {
    pub mu: T,
    pub lambda: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YoungPoisson<T> {
    pub young: T,
    pub poisson: T,
}

impl<T: Real> From<YoungPoisson<T>> for LameParameters<T> {
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn from(params: YoungPoisson<T>) -> Self {
        let YoungPoisson { young, poisson } = params;
        let mu = 0.5 * young / (1.0 + poisson);
        let lambda = 2.0 * mu * poisson / (1.0 - 2.0 * poisson);
        Self { mu, lambda }
    }
}

/// Tangent of an elastic material, applied to pairs of vectors.
pub trait StressContraction<T: Real, const D: usize> {
    /// Computes the contraction `C(a, b)_ij = sum_kl C_ikjl a_k b_l` of the tangent `C`.
    fn contract(&self, a: &SVector<T, D>, b: &SVector<T, D>) -> SMatrix<T, D, D>;
}

/// A small-strain elastic law, mapping the displacement gradient to the Cauchy stress.
pub trait ElasticityLaw<T: Real, const D: usize>: Sync {
    type Tangent: StressContraction<T, D>;

    fn update(
        &self,
        element: usize,
        quadrature_point: usize,
        displacement_gradient: &SMatrix<T, D, D>,
    ) -> Result<(SMatrix<T, D, D>, Self::Tangent), ConstitutiveError>;
}

/// The linear elastic material model.
///
/// Given Lamé parameters `mu` and `lambda`, the stress is `2 mu eps + lambda tr(eps) I`
/// with the infinitesimal strain `eps = (grad u + grad u^T) / 2`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearElasticMaterial<T> {
    pub parameters: LameParameters<T>,
}

impl<T> LinearElasticMaterial<T> {
    pub fn new(parameters: impl Into<LameParameters<T>>) -> Self {
        Self {
            parameters: parameters.into(),
        }
    }
}

impl<T: Real, const D: usize> StressContraction<T, D> for LameParameters<T> {
    fn contract(&self, a: &SVector<T, D>, b: &SVector<T, D>) -> SMatrix<T, D, D> {
        let &LameParameters { mu, lambda } = self;
        let identity = SMatrix::<T, D, D>::identity();
        (identity * a.dot(b) + b * a.transpose()) * mu + a * b.transpose() * lambda
    }
}

#[allow(non_snake_case)]
pub fn infinitesimal_strain_tensor<T: Real, const D: usize>(displacement_gradient: &SMatrix<T, D, D>) -> SMatrix<T, D, D> {
    let H = displacement_gradient;
    (H + H.transpose()) * nalgebra::convert::<f64, T>(0.5)
}

impl<T: Real, const D: usize> ElasticityLaw<T, D> for LinearElasticMaterial<T> {
    type Tangent = LameParameters<T>;

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    fn update(
        &self,
        _element: usize,
        _quadrature_point: usize,
        displacement_gradient: &SMatrix<T, D, D>,
    ) -> Result<(SMatrix<T, D, D>, Self::Tangent), ConstitutiveError> {
        let LameParameters { mu, lambda } = self.parameters;
        let eps = infinitesimal_strain_tensor(displacement_gradient);
        let stress = eps * 2.0 * mu + SMatrix::<T, D, D>::identity() * (lambda * eps.trace());
        if stress.iter().any(|s| !s.is_finite()) {
            return Err(ConstitutiveError::NonFiniteResponse);
        }
        Ok((stress, self.parameters))
    }
}
