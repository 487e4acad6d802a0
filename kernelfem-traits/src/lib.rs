use nalgebra::RealField;

pub use nalgebra;

/// Scalar type used throughout element kernels.
///
/// Element-local buffers are fixed-size arrays of `T`, so the scalar must be `Copy`.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}

/// Converts an `f64` constant into `T`.
///
/// Every `Real` type we support can represent `f64` constants approximately, so this never
/// fails for the scalar types used in practice.
#[inline(always)]
pub fn real<T: Real>(value: f64) -> T {
    nalgebra::convert(value)
}
