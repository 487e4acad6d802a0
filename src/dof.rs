//! Mapping of nodes to global degrees of freedom, and ownership of global rows.
use crate::error::AssemblyError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Maps `(node, component)` pairs to global DOF indices.
///
/// The DOFs of a node are consecutive, starting at the node's first DOF. The process owns the
/// contiguous range of global DOFs `[rank_offset, rank_offset + num_owned)`. All other DOFs are
/// ghosts: elements may read them, but never scatter into their rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DofMap {
    dofs_per_node: usize,
    node_first_dof: Vec<usize>,
    num_global_dofs: usize,
    rank_offset: usize,
    num_owned: usize,
}

impl DofMap {
    /// The DOF map of a single process owning all nodes, numbered node by node.
    pub fn contiguous(num_nodes: usize, dofs_per_node: usize) -> Self {
        Self {
            dofs_per_node,
            node_first_dof: (0..num_nodes).map(|node| dofs_per_node * node).collect(),
            num_global_dofs: dofs_per_node * num_nodes,
            rank_offset: 0,
            num_owned: dofs_per_node * num_nodes,
        }
    }

    /// Creates a DOF map from the first global DOF of every node.
    ///
    /// The DOF ranges of distinct nodes must be disjoint, since colored launches rely on
    /// elements without shared nodes never writing to the same rows.
    pub fn try_new(
        dofs_per_node: usize,
        node_first_dof: Vec<usize>,
        num_global_dofs: usize,
        owned: Range<usize>,
    ) -> Result<Self, AssemblyError> {
        if let Some(&first) = node_first_dof
            .iter()
            .find(|&&first| first + dofs_per_node > num_global_dofs)
        {
            return Err(AssemblyError::SizeMismatch {
                what: "global DOFs referenced by node",
                expected: num_global_dofs,
                actual: first + dofs_per_node,
            });
        }
        let mut nodes_by_first_dof: Vec<usize> = (0..node_first_dof.len()).collect();
        nodes_by_first_dof.sort_by_key(|&node| node_first_dof[node]);
        for pair in nodes_by_first_dof.windows(2) {
            let (node, other_node) = (pair[0], pair[1]);
            if dofs_per_node > 0 && node_first_dof[node] + dofs_per_node > node_first_dof[other_node] {
                return Err(AssemblyError::OverlappingNodeDofs { node, other_node });
            }
        }
        let map = Self {
            dofs_per_node,
            node_first_dof,
            num_global_dofs,
            rank_offset: 0,
            num_owned: num_global_dofs,
        };
        map.with_ownership(owned)
    }

    /// Restricts ownership to the given range of global DOFs.
    pub fn with_ownership(self, owned: Range<usize>) -> Result<Self, AssemblyError> {
        if owned.start > owned.end || owned.end > self.num_global_dofs {
            return Err(AssemblyError::SizeMismatch {
                what: "owned DOF range",
                expected: self.num_global_dofs,
                actual: owned.end,
            });
        }
        Ok(Self {
            rank_offset: owned.start,
            num_owned: owned.end - owned.start,
            ..self
        })
    }

    pub fn dofs_per_node(&self) -> usize {
        self.dofs_per_node
    }

    pub fn num_nodes(&self) -> usize {
        self.node_first_dof.len()
    }

    pub fn num_global_dofs(&self) -> usize {
        self.num_global_dofs
    }

    /// The first global DOF owned by this process.
    pub fn rank_offset(&self) -> usize {
        self.rank_offset
    }

    pub fn num_owned(&self) -> usize {
        self.num_owned
    }

    /// The global DOF of the given component of a node.
    #[inline]
    pub fn dof(&self, node: usize, component: usize) -> usize {
        debug_assert!(component < self.dofs_per_node);
        self.node_first_dof[node] + component
    }

    #[inline]
    pub fn is_owned(&self, global_dof: usize) -> bool {
        self.local_row(global_dof).is_some()
    }

    /// The row of an owned DOF in the local part of the global system.
    #[inline]
    pub fn local_row(&self, global_dof: usize) -> Option<usize> {
        global_dof
            .checked_sub(self.rank_offset)
            .filter(|&row| row < self.num_owned)
    }

    /// Gathers the global DOFs of the nodes `nodes` into `output`, node by node.
    #[inline]
    pub fn populate_element_dofs<const S: usize>(&self, nodes: &[usize], output: &mut [[usize; S]]) {
        debug_assert_eq!(S, self.dofs_per_node);
        for (node_dofs, &node) in output.iter_mut().zip(nodes) {
            let first = self.node_first_dof[node];
            for (i, dof) in node_dofs.iter_mut().enumerate() {
                *dof = first + i;
            }
        }
    }
}
