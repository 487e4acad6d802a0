//! Quadrature rules for reference domains.
//!
//! Rules are computed in `f64` and converted to the scalar type of the element kernel once,
//! when the kernel's quadrature space is built.
use crate::Real;
use nalgebra::SVector;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod simplex;
pub mod tensor;
pub mod univariate;

/// A D-dimensional rule in `f64`, stored as weights and points.
pub type Rule<const D: usize> = (Vec<f64>, Vec<[f64; D]>);

/// A D-dimensional rule in the scalar type `T`.
pub type QuadraturePair<T, const D: usize> = (Vec<T>, Vec<SVector<T, D>>);

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuadratureError {
    /// Indicates that a rule satisfying the given requirements is not available.
    NoRuleAvailable,
}

impl Display for QuadratureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRuleAvailable => {
                write!(f, "There is no quadrature rule satisfying the requirements available")
            }
        }
    }
}

impl std::error::Error for QuadratureError {}

pub fn convert_rule<T: Real, const D: usize>(rule: Rule<D>) -> QuadraturePair<T, D> {
    let (weights, points) = rule;
    let weights = weights.into_iter().map(nalgebra::convert::<f64, T>).collect();
    let points = points
        .into_iter()
        .map(|p| SVector::from(p.map(nalgebra::convert::<f64, T>)))
        .collect();
    (weights, points)
}

/// Approximates the integral of `f` over the reference domain of the rule.
pub fn integrate<T: Real, const D: usize>(rule: &QuadraturePair<T, D>, f: impl Fn(&SVector<T, D>) -> T) -> T {
    let (weights, points) = rule;
    weights
        .iter()
        .zip(points)
        .fold(T::zero(), |acc, (&w, p)| acc + w * f(p))
}
