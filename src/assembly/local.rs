//! Element-local state and the setup/compute/complete contract of element kernels.
use crate::assembly::global::AssemblyTarget;
use crate::element::ElementType;
use crate::error::AssemblyError;
use crate::Real;
use nalgebra::{SMatrix, SVector};

/// Connectivity of elements to nodes.
pub trait ElementConnectivityAssembler {
    fn num_elements(&self) -> usize;

    fn num_nodes(&self) -> usize;

    fn element_node_count(&self, element_index: usize) -> usize;

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize);
}

/// Lifecycle of a local stack while it processes one element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StackState {
    Uninitialized,
    SetUp,
    Accumulating,
    Completed,
}

/// Fixed-size scratch space for one element with `N` nodes in `D` dimensions and `S` degrees
/// of freedom per node.
///
/// Local DOF `(a, i)` is component `i` of node `a`. The Jacobian is stored as `N x N` blocks
/// of size `S x S`, where block `(a, b)` couples the DOFs of node `a` to the DOFs of node `b`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ElementStack<T: Real, const D: usize, const N: usize, const S: usize> {
    pub state: StackState,
    pub x_local: [SVector<T, D>; N],
    pub u_local: [SVector<T, S>; N],
    pub dof_indices: [[usize; S]; N],
    pub residual: [SVector<T, S>; N],
    pub jacobian: [[SMatrix<T, S, S>; N]; N],
}

impl<T: Real, const D: usize, const N: usize, const S: usize> Default for ElementStack<T, D, N, S> {
    fn default() -> Self {
        Self {
            state: StackState::Uninitialized,
            x_local: [SVector::zeros(); N],
            u_local: [SVector::zeros(); N],
            dof_indices: [[usize::MAX; S]; N],
            residual: [SVector::zeros(); N],
            jacobian: [[SMatrix::zeros(); N]; N],
        }
    }
}

impl<T: Real, const D: usize, const N: usize, const S: usize> ElementStack<T, D, N, S> {
    /// Zeroes the accumulators before gathering a new element.
    pub fn reset_accumulators(&mut self) {
        self.residual = [SVector::zeros(); N];
        self.jacobian = [[SMatrix::zeros(); N]; N];
    }

    /// Whether all entries of the local residual and Jacobian are finite.
    pub fn is_finite(&self) -> bool {
        let residual_finite = self.residual.iter().all(|r| r.iter().all(|x| x.is_finite()));
        residual_finite
            && self
                .jacobian
                .iter()
                .flatten()
                .all(|block| block.iter().all(|x| x.is_finite()))
    }

    /// The largest absolute entry of the local residual among the rows accepted by `is_owned`.
    ///
    /// Returns NaN if any considered entry is NaN.
    pub fn max_abs_residual(&self, mut is_owned: impl FnMut(usize) -> bool) -> T {
        let mut max = T::zero();
        for (r_a, dofs_a) in self.residual.iter().zip(&self.dof_indices) {
            for (&r, &dof) in r_a.iter().zip(dofs_a) {
                if is_owned(dof) {
                    if r != r {
                        return r;
                    }
                    max = max.max(r.abs());
                }
            }
        }
        max
    }

    /// Scatters the local residual and Jacobian into `target`.
    ///
    /// Rows whose global DOF lies outside the target's local row range are skipped. Returns the
    /// largest absolute local residual entry among the scattered rows.
    pub fn scatter<A>(&self, target: &A) -> Result<T, AssemblyError>
    where
        A: ?Sized + AssemblyTarget<T>,
    {
        let rank_offset = target.rank_offset();
        let num_rows = target.num_local_rows();
        let local_row = |dof: usize| dof.checked_sub(rank_offset).filter(|&row| row < num_rows);
        let columns = self.dof_indices.as_flattened();

        let mut row_values = [[T::zero(); S]; N];
        for a in 0..N {
            for i in 0..S {
                let Some(row) = local_row(self.dof_indices[a][i]) else {
                    continue;
                };
                for b in 0..N {
                    for j in 0..S {
                        row_values[b][j] = self.jacobian[a][b][(i, j)];
                    }
                }
                target.add_to_row(row, columns, row_values.as_flattened())?;
                target.add_to_entry(row, self.residual[a][i])?;
            }
        }

        Ok(self.max_abs_residual(|dof| local_row(dof).is_some()))
    }
}

/// Local stacks expose their sizes so that kernels can be checked against element tables.
pub trait LocalStack: Send {
    fn state(&self) -> StackState;

    fn num_nodes(&self) -> usize;

    /// The number of rows (and columns) of the local system.
    fn num_local_dofs(&self) -> usize;
}

impl<T: Real, const D: usize, const N: usize, const S: usize> LocalStack for ElementStack<T, D, N, S> {
    fn state(&self) -> StackState {
        self.state
    }

    fn num_nodes(&self) -> usize {
        N
    }

    fn num_local_dofs(&self) -> usize {
        N * S
    }
}

/// An element kernel specialized for one element type and one material law.
///
/// Processing element `e` consists of [`setup`](Self::setup), one call to
/// [`quadrature_point_compute`](Self::quadrature_point_compute) per quadrature point and finally
/// [`complete`](Self::complete). Setup and quadrature point computations only modify the stack.
/// Completion scatters the stack into the target and returns the element's contribution to the
/// launcher's reduction.
pub trait ElementKernel<T: Real>: ElementConnectivityAssembler + Sync {
    type Stack: LocalStack;

    fn element_type(&self) -> ElementType;

    fn num_quadrature_points(&self) -> usize;

    fn dofs_per_node(&self) -> usize;

    fn create_stack(&self) -> Self::Stack;

    /// Gathers the nodal data of `element` into `stack`.
    fn setup(&self, element: usize, stack: &mut Self::Stack) -> Result<(), AssemblyError>;

    /// Adds the weighted contributions of one quadrature point to the stack's accumulators.
    fn quadrature_point_compute(
        &self,
        element: usize,
        quadrature_point: usize,
        stack: &mut Self::Stack,
    ) -> Result<(), AssemblyError>;

    fn complete<A>(&self, element: usize, stack: &mut Self::Stack, target: &A) -> Result<T, AssemblyError>
    where
        A: ?Sized + AssemblyTarget<T>;

    /// Runs setup, all quadrature points in ascending order and completion for one element.
    ///
    /// The first failure encountered in this order is returned.
    fn process_element<A>(&self, element: usize, stack: &mut Self::Stack, target: &A) -> Result<T, AssemblyError>
    where
        A: ?Sized + AssemblyTarget<T>,
    {
        self.setup(element, stack)?;
        for q in 0..self.num_quadrature_points() {
            self.quadrature_point_compute(element, q, stack)?;
        }
        self.complete(element, stack, target)
    }
}
