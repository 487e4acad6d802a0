use crate::assembly::global::AssemblyTarget;
use crate::assembly::local::{ElementConnectivityAssembler, ElementKernel, ElementStack, StackState};
use crate::constitutive::{ElasticityLaw, StressContraction};
use crate::dof::DofMap;
use crate::element::{ElementType, ReferenceElement};
use crate::error::AssemblyError;
use crate::kernels::{check_kernel_inputs, complete_element, gather_element};
use crate::mesh::RegionMesh;
use crate::space::ElementQuadratureSpace;
use crate::Real;
use nalgebra::{SMatrix, SVector};

/// Kernel for small-strain quasi-static elasticity `-div sigma(grad u) = b`.
///
/// The unknowns are the `D` displacement components of every node. The residual and the
/// Jacobian blocks of nodes `a` and `b` are
///
/// ```text
/// R_a  = int sigma grad N_a - N_a b
/// K_ab = int C(grad N_a, grad N_b)
/// ```
///
/// where `C` is the stress contraction of the material tangent.
pub struct ElasticityKernel<'a, T: Real, E, M, const D: usize, const N: usize> {
    mesh: &'a RegionMesh<T>,
    dofs: &'a DofMap,
    solution: &'a [T],
    body_force: SVector<T, D>,
    material: M,
    space: ElementQuadratureSpace<T, E, D, N>,
    check_finite: bool,
}

impl<'a, T, E, M, const D: usize, const N: usize> ElasticityKernel<'a, T, E, M, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
    M: ElasticityLaw<T, D>,
{
    /// Creates a kernel for the region `mesh` with the current displacement estimate `solution`.
    pub fn try_new(
        mesh: &'a RegionMesh<T>,
        dofs: &'a DofMap,
        solution: &'a [T],
        material: M,
    ) -> Result<Self, AssemblyError> {
        check_kernel_inputs::<T, D, D>(E::ELEMENT_TYPE, mesh, dofs, solution)?;
        Ok(Self {
            mesh,
            dofs,
            solution,
            body_force: SVector::zeros(),
            material,
            space: ElementQuadratureSpace::new(),
            check_finite: true,
        })
    }

    /// Sets a constant body force density `b`.
    pub fn with_body_force(self, body_force: SVector<T, D>) -> Self {
        Self { body_force, ..self }
    }

    pub fn with_check_finite(self, check_finite: bool) -> Self {
        Self { check_finite, ..self }
    }
}

impl<'a, T, E, M, const D: usize, const N: usize> ElementConnectivityAssembler for ElasticityKernel<'a, T, E, M, D, N>
where
    T: Real,
{
    fn num_elements(&self) -> usize {
        self.mesh.num_elements()
    }

    fn num_nodes(&self) -> usize {
        self.mesh.num_vertices()
    }

    fn element_node_count(&self, _element_index: usize) -> usize {
        N
    }

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize) {
        output.copy_from_slice(self.mesh.element_nodes(element_index));
    }
}

impl<'a, T, E, M, const D: usize, const N: usize> ElementKernel<T> for ElasticityKernel<'a, T, E, M, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
    M: ElasticityLaw<T, D>,
{
    type Stack = ElementStack<T, D, N, D>;

    fn element_type(&self) -> ElementType {
        E::ELEMENT_TYPE
    }

    fn num_quadrature_points(&self) -> usize {
        self.space.num_quadrature_points()
    }

    fn dofs_per_node(&self) -> usize {
        D
    }

    fn create_stack(&self) -> Self::Stack {
        ElementStack::default()
    }

    fn setup(&self, element: usize, stack: &mut Self::Stack) -> Result<(), AssemblyError> {
        gather_element(self.mesh, self.dofs, self.solution, element, stack);
        Ok(())
    }

    #[allow(non_snake_case)]
    fn quadrature_point_compute(
        &self,
        element: usize,
        quadrature_point: usize,
        stack: &mut Self::Stack,
    ) -> Result<(), AssemblyError> {
        debug_assert!(
            matches!(stack.state, StackState::SetUp | StackState::Accumulating),
            "Stack must be set up before quadrature point evaluation"
        );
        let basis = self
            .space
            .evaluate(quadrature_point, &stack.x_local)
            .map_err(|err| err.in_element(element))?;

        // H = sum_a u_a (grad N_a)^T
        let displacement_gradient = basis
            .gradients
            .iter()
            .zip(&stack.u_local)
            .fold(SMatrix::<T, D, D>::zeros(), |H, (grad_N_a, u_a)| H + u_a * grad_N_a.transpose());

        let (stress, tangent) = self
            .material
            .update(element, quadrature_point, &displacement_gradient)
            .map_err(|reason| AssemblyError::Constitutive {
                element,
                quadrature_point,
                reason,
            })?;

        let scale = basis.scale();
        for a in 0..N {
            let grad_N_a = &basis.gradients[a];
            stack.residual[a] += (stress * grad_N_a - self.body_force * basis.values[a]) * scale;
            for b in 0..N {
                let grad_N_b = &basis.gradients[b];
                stack.jacobian[a][b] += tangent.contract(grad_N_a, grad_N_b) * scale;
            }
        }
        stack.state = StackState::Accumulating;
        Ok(())
    }

    fn complete<A>(&self, element: usize, stack: &mut Self::Stack, target: &A) -> Result<T, AssemblyError>
    where
        A: ?Sized + AssemblyTarget<T>,
    {
        complete_element(element, stack, target, self.check_finite)
    }
}
