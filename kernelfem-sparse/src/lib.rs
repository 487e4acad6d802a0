//! Sparse storage for concurrent finite element assembly.
//!
//! The structures in this crate have a sparsity pattern that is fixed at construction time.
//! Values are stored as atomics, so that many threads can *add* into shared entries without
//! locking. Reading back the values requires exclusive access, which guarantees that no
//! accumulation is in flight.

mod atomic;
mod matrix;
mod pattern;
mod vector;

pub use atomic::AtomicReal;
pub use matrix::{AtomicCsrMatrix, MissingEntry};
pub use pattern::{pattern_from_sorted_coordinates, search_lane};
pub use vector::AtomicVector;

pub use nalgebra_sparse;
