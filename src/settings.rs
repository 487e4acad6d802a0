//! Plain-data configuration of assembly passes.
use crate::Real;
use serde::{Deserialize, Serialize};

/// How the launcher distributes the elements of a region.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionPolicy {
    /// Ascending element order on the calling thread.
    Serial,
    /// Data-parallel over all elements with atomic scatter.
    ///
    /// Entries are exact sums of all contributions, but the summation order of entries shared
    /// between elements is not fixed.
    #[default]
    Parallel,
    /// Colors run one after another, and the elements of a color run in parallel.
    ///
    /// No two elements of a color share a node, so every entry receives its contributions in a
    /// fixed order and repeated passes are bit-identical.
    Colored,
}

/// Commutative and associative combination of per-element return values.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReductionOp {
    #[default]
    Max,
    Sum,
}

impl ReductionOp {
    /// The identity of the operation for non-negative values.
    pub fn identity<T: Real>(&self) -> T {
        T::zero()
    }

    pub fn combine<T: Real>(&self, a: T, b: T) -> T {
        match self {
            // NaN must win, so that a non-finite element is never hidden by the reduction
            Self::Max if a != a => a,
            Self::Max if b != b => b,
            Self::Max => a.max(b),
            Self::Sum => a + b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    pub policy: ExecutionPolicy,
    pub reduction: ReductionOp,
    /// Minimum number of elements handled by a single parallel task.
    pub min_elements_per_task: usize,
    /// Whether kernels reject elements whose local contributions are not finite.
    pub check_finite: bool,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            policy: ExecutionPolicy::default(),
            reduction: ReductionOp::default(),
            min_elements_per_task: 64,
            check_finite: true,
        }
    }
}

impl AssemblySettings {
    pub fn with_policy(self, policy: ExecutionPolicy) -> Self {
        Self { policy, ..self }
    }

    pub fn with_reduction(self, reduction: ReductionOp) -> Self {
        Self { reduction, ..self }
    }
}
