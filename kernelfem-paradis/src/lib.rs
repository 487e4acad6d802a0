//! paradis
//! =======
//!
//! Partitioning of index subsets into groups of mutually disjoint subsets.
//!
//! A finite element touches the degrees of freedom of its nodes. If no two elements in a group
//! share a node, the elements of the group can be processed concurrently without any two of them
//! writing to the same row of a global system.

pub mod coloring;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

pub use kernelfem_nested_vec::NestedVec;

/// Index subsets, stored contiguously.
pub type Subsets = NestedVec<usize>;

/// A set of labeled subsets of indices, in which no two subsets share an index.
///
/// Indices may repeat within a single subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisjointSubsets {
    subsets: Subsets,
    labels: Vec<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubsetsNotDisjointError {
    /// An index that occurs in more than one subset.
    pub index: usize,
}

impl Display for SubsetsNotDisjointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "index {} is shared by more than one subset", self.index)
    }
}

impl Error for SubsetsNotDisjointError {}

impl DisjointSubsets {
    pub fn try_from_disjoint_subsets(subsets: Subsets, labels: Vec<usize>) -> Result<Self, SubsetsNotDisjointError> {
        assert_eq!(subsets.len(), labels.len(), "Must have exactly one label per subset.");

        let mut global_index_set = HashSet::new();
        // Subsets may contain duplicates, so deduplicate locally before checking globally
        let mut local_index_set = HashSet::new();
        for subset in subsets.iter() {
            local_index_set.clear();
            local_index_set.extend(subset.iter().copied());
            for &idx in &local_index_set {
                if !global_index_set.insert(idx) {
                    return Err(SubsetsNotDisjointError { index: idx });
                }
            }
        }

        Ok(Self { subsets, labels })
    }

    pub(crate) fn from_disjoint_subsets_unchecked(subsets: Subsets, labels: Vec<usize>) -> Self {
        debug_assert_eq!(subsets.len(), labels.len());
        Self { subsets, labels }
    }

    pub fn subsets(&self) -> &Subsets {
        &self.subsets
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// A parallel iterator over the labels of the subsets.
    pub fn par_labels(&self) -> rayon::slice::Iter<'_, usize> {
        self.labels.par_iter()
    }
}
