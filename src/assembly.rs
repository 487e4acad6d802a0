//! The kernel contract, the global assembly target and the drivers that connect them.
//!
//! The lifecycle of one assembly pass is
//!
//! 1. [`GlobalSystem::begin_pass`](global::GlobalSystem::begin_pass) zeroes the target,
//! 2. one or more regions are launched with [`launcher::launch`], each with a kernel
//!    specialized by a factory in [`factory`],
//! 3. [`GlobalSystem::finalize`](global::GlobalSystem::finalize) hands out the assembled
//!    matrix and residual.
//!
//! A pass that fails leaves the target cleared.

pub mod factory;
pub mod global;
pub mod launcher;
pub mod local;
