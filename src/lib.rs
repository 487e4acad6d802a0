//! Element kernels and concurrent global assembly for finite element computations.
//!
//! An element kernel binds a reference element and a material law. For every element of a
//! homogeneous region, the kernel gathers nodal data into a fixed-size stack buffer, integrates
//! the element's residual and Jacobian over the quadrature points of the element, and finally
//! scatters the local contributions into a shared global system. The launcher runs the kernel
//! over all elements of a region with one of several execution policies and reduces the
//! per-element return values into a single scalar.

pub mod assembly;
pub mod constitutive;
pub mod dof;
pub mod element;
pub mod error;
pub mod kernels;
pub mod mesh;
pub mod quadrature;
pub mod settings;
pub mod space;

pub use kernelfem_traits::{real, Real};

pub extern crate kernelfem_paradis as paradis;
pub extern crate kernelfem_sparse as sparse;
pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
