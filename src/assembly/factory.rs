//! Selection of statically specialized kernels from runtime tags.
//!
//! A factory matches the element type of a region and a material enum once, constructs the
//! kernel specialized for that combination and hands it to a [`KernelVisitor`]. The visitor is
//! generic over the kernel, so everything it does with the kernel, in particular the
//! per-element loop, is monomorphized and free of dynamic dispatch.
use crate::assembly::global::AssemblyTarget;
use crate::assembly::launcher::launch;
use crate::assembly::local::ElementKernel;
use crate::constitutive::{ConstantConductivity, LinearElasticMaterial, TemperatureDependentConductivity};
use crate::dof::DofMap;
use crate::element::{ElementType, Hex8, Quad4, Segment2, Tet4, Tri3};
use crate::error::AssemblyError;
use crate::kernels::{DiffusionKernel, ElasticityKernel};
use crate::mesh::RegionMesh;
use crate::settings::AssemblySettings;
use crate::Real;
use eyre::WrapErr;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};

/// Consumes a statically specialized kernel.
pub trait KernelVisitor<T: Real> {
    type Output;

    fn visit<K: ElementKernel<T>>(self, kernel: K) -> Self::Output;
}

/// Visitor that launches the kernel over its region.
pub struct LaunchVisitor<'a, A: ?Sized> {
    pub target: &'a A,
    pub settings: &'a AssemblySettings,
}

impl<'a, T, A> KernelVisitor<T> for LaunchVisitor<'a, A>
where
    T: Real,
    A: ?Sized + AssemblyTarget<T>,
{
    type Output = Result<T, AssemblyError>;

    fn visit<K: ElementKernel<T>>(self, kernel: K) -> Self::Output {
        launch(&kernel, self.target, self.settings)
    }
}

/// Material laws available to the diffusion kernel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DiffusionMaterial<T> {
    Constant(ConstantConductivity<T>),
    TemperatureDependent(TemperatureDependentConductivity<T>),
}

impl<T> DiffusionMaterial<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant(_) => "constant conductivity",
            Self::TemperatureDependent(_) => "temperature dependent conductivity",
        }
    }
}

/// Material laws available to the elasticity kernel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ElasticMaterial<T> {
    LinearElastic(LinearElasticMaterial<T>),
}

impl<T> ElasticMaterial<T> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LinearElastic(_) => "linear elastic",
        }
    }
}

/// Expands `$body` once per element type, with `$E` bound to the reference element and `$D`,
/// `$N` bound to its dimension and node count.
macro_rules! dispatch_element_type {
    ($element_type:expr, |$E:ident, $D:ident, $N:ident| $body:block) => {
        match $element_type {
            ElementType::Segment2 => dispatch_element_type!(@arm Segment2, 1, 2, $E, $D, $N, $body),
            ElementType::Tri3 => dispatch_element_type!(@arm Tri3, 2, 3, $E, $D, $N, $body),
            ElementType::Quad4 => dispatch_element_type!(@arm Quad4, 2, 4, $E, $D, $N, $body),
            ElementType::Tet4 => dispatch_element_type!(@arm Tet4, 3, 4, $E, $D, $N, $body),
            ElementType::Hex8 => dispatch_element_type!(@arm Hex8, 3, 8, $E, $D, $N, $body),
        }
    };
    (@arm $element:ty, $dim:literal, $nodes:literal, $E:ident, $D:ident, $N:ident, $body:block) => {{
        type $E = $element;
        const $D: usize = $dim;
        const $N: usize = $nodes;
        $body
    }};
}

/// Builds diffusion kernels for a region.
#[derive(Debug, Clone)]
pub struct DiffusionKernelFactory<'a, T> {
    mesh: &'a RegionMesh<T>,
    dofs: &'a DofMap,
    solution: &'a [T],
    source: T,
    check_finite: bool,
}

impl<'a, T: Real> DiffusionKernelFactory<'a, T> {
    pub fn new(mesh: &'a RegionMesh<T>, dofs: &'a DofMap, solution: &'a [T]) -> Self {
        Self {
            mesh,
            dofs,
            solution,
            source: T::zero(),
            check_finite: true,
        }
    }

    pub fn with_source(self, source: T) -> Self {
        Self { source, ..self }
    }

    pub fn with_settings(self, settings: &AssemblySettings) -> Self {
        Self {
            check_finite: settings.check_finite,
            ..self
        }
    }

    /// Constructs the kernel for the region's element type and `material`, and passes it to
    /// `visitor`.
    pub fn dispatch<V>(&self, material: &DiffusionMaterial<T>, visitor: V) -> Result<V::Output, AssemblyError>
    where
        V: KernelVisitor<T>,
    {
        let &Self {
            mesh,
            dofs,
            solution,
            source,
            check_finite,
        } = self;
        dispatch_element_type!(mesh.element_type(), |E, D, N| {
            match *material {
                DiffusionMaterial::Constant(law) => {
                    let kernel = DiffusionKernel::<T, E, _, D, N>::try_new(mesh, dofs, solution, law)?;
                    Ok(visitor.visit(kernel.with_source(source).with_check_finite(check_finite)))
                }
                DiffusionMaterial::TemperatureDependent(law) => {
                    let kernel = DiffusionKernel::<T, E, _, D, N>::try_new(mesh, dofs, solution, law)?;
                    Ok(visitor.visit(kernel.with_source(source).with_check_finite(check_finite)))
                }
            }
        })
    }
}

/// Builds elasticity kernels for a region.
#[derive(Debug, Clone)]
pub struct ElasticityKernelFactory<'a, T> {
    mesh: &'a RegionMesh<T>,
    dofs: &'a DofMap,
    solution: &'a [T],
    body_force: [T; 3],
    check_finite: bool,
}

impl<'a, T: Real> ElasticityKernelFactory<'a, T> {
    pub fn new(mesh: &'a RegionMesh<T>, dofs: &'a DofMap, solution: &'a [T]) -> Self {
        Self {
            mesh,
            dofs,
            solution,
            body_force: [T::zero(); 3],
            check_finite: true,
        }
    }

    /// Sets a constant body force density. Components beyond the spatial dimension of the
    /// region must be zero.
    pub fn with_body_force(self, body_force: &[T]) -> Result<Self, AssemblyError> {
        if body_force.len() > 3 || body_force.iter().skip(self.mesh.dim()).any(|f| !f.is_zero()) {
            return Err(AssemblyError::DimensionMismatch {
                what: "body force",
                expected: self.mesh.dim(),
                actual: body_force.len(),
            });
        }
        let mut padded = [T::zero(); 3];
        padded[..body_force.len()].copy_from_slice(body_force);
        Ok(Self {
            body_force: padded,
            ..self
        })
    }

    pub fn with_settings(self, settings: &AssemblySettings) -> Self {
        Self {
            check_finite: settings.check_finite,
            ..self
        }
    }

    pub fn dispatch<V>(&self, material: &ElasticMaterial<T>, visitor: V) -> Result<V::Output, AssemblyError>
    where
        V: KernelVisitor<T>,
    {
        let &Self {
            mesh,
            dofs,
            solution,
            body_force,
            check_finite,
        } = self;
        dispatch_element_type!(mesh.element_type(), |E, D, N| {
            let body_force = SVector::<T, D>::from_fn(|i, _| body_force[i]);
            match *material {
                ElasticMaterial::LinearElastic(law) => {
                    let kernel = ElasticityKernel::<T, E, _, D, N>::try_new(mesh, dofs, solution, law)?;
                    Ok(visitor.visit(kernel.with_body_force(body_force).with_check_finite(check_finite)))
                }
            }
        })
    }
}

/// Assembles the diffusion residual and Jacobian of a region into `target`.
///
/// Returns the reduction of the per-element values.
pub fn assemble_diffusion<T, A>(
    factory: &DiffusionKernelFactory<T>,
    material: &DiffusionMaterial<T>,
    target: &A,
    settings: &AssemblySettings,
) -> eyre::Result<T>
where
    T: Real,
    A: ?Sized + AssemblyTarget<T>,
{
    let visitor = LaunchVisitor { target, settings };
    let result = factory
        .dispatch(material, visitor)
        .and_then(|launched| launched)
        .wrap_err_with(|| {
            format!(
                "diffusion assembly failed for region of {} elements with {}",
                factory.mesh.element_type(),
                material.name()
            )
        })?;
    Ok(result)
}

/// Assembles the elasticity residual and Jacobian of a region into `target`.
pub fn assemble_elasticity<T, A>(
    factory: &ElasticityKernelFactory<T>,
    material: &ElasticMaterial<T>,
    target: &A,
    settings: &AssemblySettings,
) -> eyre::Result<T>
where
    T: Real,
    A: ?Sized + AssemblyTarget<T>,
{
    let visitor = LaunchVisitor { target, settings };
    let result = factory
        .dispatch(material, visitor)
        .and_then(|launched| launched)
        .wrap_err_with(|| {
            format!(
                "elasticity assembly failed for region of {} elements with {}",
                factory.mesh.element_type(),
                material.name()
            )
        })?;
    Ok(result)
}
