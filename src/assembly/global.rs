//! Global sparsity patterns and the shared assembly target.
use crate::assembly::local::ElementConnectivityAssembler;
use crate::dof::DofMap;
use crate::error::AssemblyError;
use crate::mesh::RegionMesh;
use crate::Real;
use eyre::WrapErr;
use itertools::Itertools;
use kernelfem_sparse::{pattern_from_sorted_coordinates, AtomicCsrMatrix, AtomicReal, AtomicVector, MissingEntry};
use nalgebra::DVector;
use nalgebra_sparse::pattern::SparsityPattern;
use nalgebra_sparse::CsrMatrix;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// A shared residual vector and Jacobian matrix that may be accumulated concurrently.
///
/// Rows are indexed locally: local row `r` holds global DOF `rank_offset() + r`. Columns are
/// global DOF indices.
pub trait AssemblyTarget<T>: Sync {
    /// The global DOF of the first local row.
    fn rank_offset(&self) -> usize;

    fn num_local_rows(&self) -> usize;

    /// Adds `values[k]` to the matrix entry `(local_row, columns[k])` for every `k`.
    ///
    /// Columns need not be sorted. Adding to an entry outside the sparsity pattern is an error.
    fn add_to_row(&self, local_row: usize, columns: &[usize], values: &[T]) -> Result<(), AssemblyError>;

    /// Adds `value` to the residual entry of `local_row`.
    fn add_to_entry(&self, local_row: usize, value: T) -> Result<(), AssemblyError>;

    /// Resets all matrix and residual entries to zero.
    fn clear(&self);
}

/// Collects the `(local row, global column)` entries coupled by one element.
fn populate_element_entries(
    connectivity: &dyn ElementConnectivityAssembler,
    dofs: &DofMap,
    element: usize,
    element_nodes: &mut Vec<usize>,
    mut insert: impl FnMut(usize, usize),
) {
    let s = dofs.dofs_per_node();
    element_nodes.resize(connectivity.element_node_count(element), usize::MAX);
    connectivity.populate_element_nodes(element_nodes, element);
    for &node_i in element_nodes.iter() {
        for s_i in 0..s {
            let Some(row) = dofs.local_row(dofs.dof(node_i, s_i)) else {
                continue;
            };
            for &node_j in element_nodes.iter() {
                for s_j in 0..s {
                    insert(row, dofs.dof(node_j, s_j));
                }
            }
        }
    }
}

fn check_connectivity_matches_dofs(
    connectivity: &dyn ElementConnectivityAssembler,
    dofs: &DofMap,
) -> Result<(), AssemblyError> {
    if connectivity.num_nodes() != dofs.num_nodes() {
        return Err(AssemblyError::SizeMismatch {
            what: "nodes in DOF map",
            expected: connectivity.num_nodes(),
            actual: dofs.num_nodes(),
        });
    }
    Ok(())
}

/// Builds the sparsity pattern coupling all DOFs that share an element.
///
/// The pattern has one row per owned DOF and one column per global DOF. Each entry is stored
/// exactly once while collecting, which keeps memory usage low for meshes with many
/// duplicate couplings.
pub fn assemble_pattern(
    connectivity: &dyn ElementConnectivityAssembler,
    dofs: &DofMap,
) -> Result<SparsityPattern, AssemblyError> {
    check_connectivity_matches_dofs(connectivity, dofs)?;
    let mut matrix_entries = BTreeSet::new();
    let mut element_nodes = Vec::new();
    for element in 0..connectivity.num_elements() {
        populate_element_entries(connectivity, dofs, element, &mut element_nodes, |i, j| {
            matrix_entries.insert((i, j));
        });
    }

    Ok(
        pattern_from_sorted_coordinates(dofs.num_owned(), dofs.num_global_dofs(), matrix_entries)
            .expect("Internal error: pattern entries are sorted and in bounds"),
    )
}

/// Builds the same pattern as [`assemble_pattern`] with elements processed in parallel.
pub fn par_assemble_pattern<C>(connectivity: &C, dofs: &DofMap) -> Result<SparsityPattern, AssemblyError>
where
    C: ElementConnectivityAssembler + Sync,
{
    check_connectivity_matches_dofs(connectivity, dofs)?;
    let mut entries: Vec<(usize, usize)> = (0..connectivity.num_elements())
        .into_par_iter()
        .fold(
            || (Vec::new(), Vec::new()),
            |(mut entries, mut element_nodes), element| {
                populate_element_entries(connectivity, dofs, element, &mut element_nodes, |i, j| {
                    entries.push((i, j))
                });
                (entries, element_nodes)
            },
        )
        .map(|(entries, _)| entries)
        .flatten_iter()
        .collect();
    entries.par_sort_unstable();

    Ok(
        pattern_from_sorted_coordinates(dofs.num_owned(), dofs.num_global_dofs(), entries.into_iter().dedup())
            .expect("Internal error: pattern entries are sorted and in bounds"),
    )
}

/// The locally owned rows of a global Jacobian and residual.
///
/// The sparsity pattern is fixed when the system is created. Between passes, the values are
/// zeroed with [`begin_pass`](Self::begin_pass), and read back with
/// [`finalize`](Self::finalize), which requires exclusive access.
#[derive(Debug)]
pub struct GlobalSystem<T: AtomicReal> {
    matrix: AtomicCsrMatrix<T>,
    residual: AtomicVector<T>,
    rank_offset: usize,
}

impl<T: Real + AtomicReal> GlobalSystem<T> {
    pub fn from_pattern(pattern: SparsityPattern, rank_offset: usize) -> Self {
        let residual = AtomicVector::zeros(pattern.major_dim());
        Self {
            matrix: AtomicCsrMatrix::from_pattern(pattern),
            residual,
            rank_offset,
        }
    }

    /// Builds the pattern of the mesh and allocates a zero system for the owned DOFs.
    pub fn from_mesh(mesh: &RegionMesh<T>, dofs: &DofMap) -> eyre::Result<Self> {
        let pattern = par_assemble_pattern(mesh, dofs).wrap_err("failed to build sparsity pattern of region")?;
        log::debug!(
            "Allocated global system with {} rows and {} non-zeros",
            pattern.major_dim(),
            pattern.nnz()
        );
        Ok(Self::from_pattern(pattern, dofs.rank_offset()))
    }

    /// Zeroes the system at the start of an assembly pass.
    pub fn begin_pass(&self) {
        self.clear();
    }

    pub fn pattern(&self) -> &SparsityPattern {
        self.matrix.pattern()
    }

    pub fn matrix_entry(&self, local_row: usize, column: usize) -> Option<T> {
        self.matrix.get(local_row, column)
    }

    pub fn residual_entry(&self, local_row: usize) -> Option<T> {
        self.residual.get(local_row)
    }

    /// Returns the assembled Jacobian and residual.
    ///
    /// The exclusive borrow guarantees that no pass is in flight.
    pub fn finalize(&mut self) -> (CsrMatrix<T>, DVector<T>) {
        (self.matrix.to_csr(), self.residual.to_dvector())
    }
}

impl<T: Real + AtomicReal> AssemblyTarget<T> for GlobalSystem<T> {
    fn rank_offset(&self) -> usize {
        self.rank_offset
    }

    fn num_local_rows(&self) -> usize {
        self.residual.len()
    }

    fn add_to_row(&self, local_row: usize, columns: &[usize], values: &[T]) -> Result<(), AssemblyError> {
        if local_row >= self.residual.len() {
            return Err(AssemblyError::RowOutOfBounds {
                row: local_row,
                num_rows: self.residual.len(),
            });
        }
        self.matrix
            .add_to_row_unsorted(local_row, columns, values)
            .map_err(|MissingEntry { row, column }| AssemblyError::UntrackedEntry {
                row: row + self.rank_offset,
                column,
            })
    }

    fn add_to_entry(&self, local_row: usize, value: T) -> Result<(), AssemblyError> {
        if local_row >= self.residual.len() {
            return Err(AssemblyError::RowOutOfBounds {
                row: local_row,
                num_rows: self.residual.len(),
            });
        }
        self.residual.add(local_row, value);
        Ok(())
    }

    fn clear(&self) {
        self.matrix.zero();
        self.residual.zero();
    }
}
