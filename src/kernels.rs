//! Element kernels for concrete physics.
//!
//! Both kernels gather the nodal coordinates and the current solution estimate in `setup`,
//! integrate the residual and its Jacobian with respect to the nodal unknowns in
//! `quadrature_point_compute`, and scatter the owned rows in `complete`.
mod diffusion;
mod elasticity;

pub use diffusion::DiffusionKernel;
pub use elasticity::ElasticityKernel;

use crate::assembly::global::AssemblyTarget;
use crate::assembly::local::{ElementStack, StackState};
use crate::dof::DofMap;
use crate::element::ElementType;
use crate::error::AssemblyError;
use crate::mesh::RegionMesh;
use crate::Real;
use nalgebra::SVector;

/// Gathers coordinates, DOF indices and solution values of an element into the stack.
fn gather_element<T: Real, const D: usize, const N: usize, const S: usize>(
    mesh: &RegionMesh<T>,
    dofs: &DofMap,
    solution: &[T],
    element: usize,
    stack: &mut ElementStack<T, D, N, S>,
) {
    stack.x_local = mesh.gather_element_vertices(element);
    dofs.populate_element_dofs(mesh.element_nodes(element), &mut stack.dof_indices);
    for (u_a, dofs_a) in stack.u_local.iter_mut().zip(&stack.dof_indices) {
        *u_a = SVector::from_fn(|i, _| solution[dofs_a[i]]);
    }
    stack.reset_accumulators();
    stack.state = StackState::SetUp;
}

/// Finite-value check and scatter shared by the kernels.
fn complete_element<T, A, const D: usize, const N: usize, const S: usize>(
    element: usize,
    stack: &mut ElementStack<T, D, N, S>,
    target: &A,
    check_finite: bool,
) -> Result<T, AssemblyError>
where
    T: Real,
    A: ?Sized + AssemblyTarget<T>,
{
    debug_assert!(
        matches!(stack.state, StackState::SetUp | StackState::Accumulating),
        "Stack must be set up before completion"
    );
    if check_finite && !stack.is_finite() {
        return Err(AssemblyError::NonFinite { element });
    }
    let max_residual = stack.scatter(target)?;
    stack.state = StackState::Completed;
    Ok(max_residual)
}

/// Checks that the region, the DOF map and the solution fit a kernel with `S` DOFs per node.
fn check_kernel_inputs<T: Real, const D: usize, const S: usize>(
    element_type: ElementType,
    mesh: &RegionMesh<T>,
    dofs: &DofMap,
    solution: &[T],
) -> Result<(), AssemblyError> {
    if mesh.element_type() != element_type {
        return Err(AssemblyError::ElementTypeMismatch {
            expected: element_type,
            actual: mesh.element_type(),
        });
    }
    if mesh.dim() != D {
        return Err(AssemblyError::DimensionMismatch {
            what: "spatial dimension of region",
            expected: D,
            actual: mesh.dim(),
        });
    }
    if dofs.dofs_per_node() != S {
        return Err(AssemblyError::DimensionMismatch {
            what: "DOFs per node",
            expected: S,
            actual: dofs.dofs_per_node(),
        });
    }
    if dofs.num_nodes() != mesh.num_vertices() {
        return Err(AssemblyError::SizeMismatch {
            what: "nodes in DOF map",
            expected: mesh.num_vertices(),
            actual: dofs.num_nodes(),
        });
    }
    check_solution_len(dofs, solution)
}

/// Checks that the solution vector covers all global DOFs.
fn check_solution_len<T>(dofs: &DofMap, solution: &[T]) -> Result<(), AssemblyError> {
    if solution.len() != dofs.num_global_dofs() {
        return Err(AssemblyError::SizeMismatch {
            what: "solution vector",
            expected: dofs.num_global_dofs(),
            actual: solution.len(),
        });
    }
    Ok(())
}
