use crate::assembly::global::AssemblyTarget;
use crate::assembly::local::{ElementConnectivityAssembler, ElementKernel, ElementStack, StackState};
use crate::constitutive::DiffusionLaw;
use crate::dof::DofMap;
use crate::element::{ElementType, ReferenceElement};
use crate::error::AssemblyError;
use crate::kernels::{check_kernel_inputs, complete_element, gather_element};
use crate::mesh::RegionMesh;
use crate::space::ElementQuadratureSpace;
use crate::Real;
use nalgebra::SVector;

/// Kernel for the scalar diffusion equation `-div q(u, grad u) = f`.
///
/// The residual and Jacobian of node `a` are
///
/// ```text
/// R_a  = int grad N_a . q - N_a f
/// K_ab = int grad N_a . (dq/d(grad u) grad N_b + dq/du N_b)
/// ```
pub struct DiffusionKernel<'a, T: Real, E, M, const D: usize, const N: usize> {
    mesh: &'a RegionMesh<T>,
    dofs: &'a DofMap,
    solution: &'a [T],
    source: T,
    material: M,
    space: ElementQuadratureSpace<T, E, D, N>,
    check_finite: bool,
}

impl<'a, T, E, M, const D: usize, const N: usize> DiffusionKernel<'a, T, E, M, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
    M: DiffusionLaw<T, D>,
{
    /// Creates a kernel for the region `mesh` with the current solution estimate `solution`.
    pub fn try_new(
        mesh: &'a RegionMesh<T>,
        dofs: &'a DofMap,
        solution: &'a [T],
        material: M,
    ) -> Result<Self, AssemblyError> {
        check_kernel_inputs::<T, D, 1>(E::ELEMENT_TYPE, mesh, dofs, solution)?;
        Ok(Self {
            mesh,
            dofs,
            solution,
            source: T::zero(),
            material,
            space: ElementQuadratureSpace::new(),
            check_finite: true,
        })
    }

    /// Sets a constant volumetric source `f`.
    pub fn with_source(self, source: T) -> Self {
        Self { source, ..self }
    }

    pub fn with_check_finite(self, check_finite: bool) -> Self {
        Self { check_finite, ..self }
    }

    pub fn with_space(self, space: ElementQuadratureSpace<T, E, D, N>) -> Self {
        Self { space, ..self }
    }

    pub fn space(&self) -> &ElementQuadratureSpace<T, E, D, N> {
        &self.space
    }
}

impl<'a, T, E, M, const D: usize, const N: usize> ElementConnectivityAssembler for DiffusionKernel<'a, T, E, M, D, N>
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

impl<'a, T, E, M, const D: usize, const N: usize> ElementKernel<T> for DiffusionKernel<'a, T, E, M, D, N>
where
    T: Real,
    E: ReferenceElement<D, N>,
    M: DiffusionLaw<T, D>,
{
    type Stack = ElementStack<T, D, N, 1>;

    fn element_type(&self) -> ElementType {
        E::ELEMENT_TYPE
    }

    fn num_quadrature_points(&self) -> usize {
        self.space.num_quadrature_points()
    }

    fn dofs_per_node(&self) -> usize {
        1
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

        let u = basis
            .values
            .iter()
            .zip(&stack.u_local)
            .fold(T::zero(), |u, (&N_a, u_a)| u + N_a * u_a[0]);
        let grad_u = basis
            .gradients
            .iter()
            .zip(&stack.u_local)
            .fold(SVector::<T, D>::zeros(), |g, (grad_N_a, u_a)| g + grad_N_a * u_a[0]);

        let response = self
            .material
            .update(element, quadrature_point, u, &grad_u)
            .map_err(|reason| AssemblyError::Constitutive {
                element,
                quadrature_point,
                reason,
            })?;

        let scale = basis.scale();
        for a in 0..N {
            let grad_N_a = &basis.gradients[a];
            let N_a = basis.values[a];
            stack.residual[a][0] += (grad_N_a.dot(&response.flux) - N_a * self.source) * scale;
            for b in 0..N {
                let dq = response.flux_gradient_derivative * basis.gradients[b]
                    + response.flux_value_derivative * basis.values[b];
                stack.jacobian[a][b][(0, 0)] += grad_N_a.dot(&dq) * scale;
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
