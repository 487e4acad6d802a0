//! Errors raised during assembly.
use crate::element::ElementType;
use crate::Real;
use std::error::Error;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Failure of a material update at a single quadrature point.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConstitutiveError {
    /// The conductivity evaluated to a non-positive value.
    NonPositiveConductivity { conductivity: f64 },
    /// The material response contains NaN or infinite values.
    NonFiniteResponse,
    /// A local iterative update did not converge.
    NotConverged { iterations: usize },
}

impl Display for ConstitutiveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveConductivity { conductivity } => {
                write!(f, "conductivity {conductivity} is not positive")
            }
            Self::NonFiniteResponse => write!(f, "material response is not finite"),
            Self::NotConverged { iterations } => {
                write!(f, "local update did not converge in {iterations} iterations")
            }
        }
    }
}

impl Error for ConstitutiveError {}

/// The Jacobian of the geometric map is singular, inverted or not finite at a quadrature point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeometryError {
    pub quadrature_point: usize,
    pub determinant: f64,
}

impl GeometryError {
    pub fn new<T: Real>(quadrature_point: usize, determinant: T) -> Self {
        Self {
            quadrature_point,
            determinant: to_f64(determinant),
        }
    }

    pub fn in_element(self, element: usize) -> AssemblyError {
        AssemblyError::Geometry {
            element,
            quadrature_point: self.quadrature_point,
            determinant: self.determinant,
        }
    }
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Jacobian determinant {} at quadrature point {} is not strictly positive",
            self.determinant, self.quadrature_point
        )
    }
}

impl Error for GeometryError {}

/// Errors that abort an assembly pass, or prevent it from starting.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum AssemblyError {
    /// An element is inverted or degenerate.
    Geometry {
        element: usize,
        quadrature_point: usize,
        determinant: f64,
    },
    /// The material update failed at a quadrature point.
    Constitutive {
        element: usize,
        quadrature_point: usize,
        reason: ConstitutiveError,
    },
    /// The local residual or Jacobian of an element contains NaN or infinite values.
    NonFinite { element: usize },
    /// An element attempted to write to a matrix entry outside the sparsity pattern.
    UntrackedEntry { row: usize, column: usize },
    /// A local row index exceeds the number of rows of the assembly target.
    RowOutOfBounds { row: usize, num_rows: usize },
    /// An element refers to a node that does not exist.
    InvalidConnectivity { element: usize, node: usize },
    /// The DOF ranges of two nodes overlap.
    OverlappingNodeDofs { node: usize, other_node: usize },
    /// An element index exceeds the number of elements of the region.
    ElementOutOfBounds { element: usize, num_elements: usize },
    /// An element appears more than once in a launch order.
    DuplicateElement { element: usize },
    /// The region's element type differs from the element type of the kernel.
    ElementTypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },
    /// The spatial dimension or number of components does not match the physics.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Two collections that must agree in length do not.
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl AssemblyError {
    /// Whether the outer nonlinear solver may recover by retrying with a smaller increment.
    ///
    /// Inconsistencies of the mesh, the DOF map or the sparsity pattern are never recoverable,
    /// and neither are inverted elements.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Constitutive { .. } | Self::NonFinite { .. })
    }

    /// The element that caused the error, if any.
    pub fn element(&self) -> Option<usize> {
        match self {
            Self::Geometry { element, .. }
            | Self::Constitutive { element, .. }
            | Self::NonFinite { element }
            | Self::InvalidConnectivity { element, .. }
            | Self::ElementOutOfBounds { element, .. }
            | Self::DuplicateElement { element } => Some(*element),
            _ => None,
        }
    }
}

impl Display for AssemblyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry {
                element,
                quadrature_point,
                determinant,
            } => write!(
                f,
                "element {element} is inverted or degenerate: Jacobian determinant {determinant} \
                 at quadrature point {quadrature_point}"
            ),
            Self::Constitutive {
                element,
                quadrature_point,
                reason,
            } => write!(
                f,
                "material update failed in element {element} at quadrature point {quadrature_point}: {reason}"
            ),
            Self::NonFinite { element } => {
                write!(f, "element {element} produced non-finite local contributions")
            }
            Self::UntrackedEntry { row, column } => write!(
                f,
                "entry ({row}, {column}) is not part of the sparsity pattern"
            ),
            Self::RowOutOfBounds { row, num_rows } => {
                write!(f, "local row {row} is out of bounds for a target with {num_rows} rows")
            }
            Self::InvalidConnectivity { element, node } => {
                write!(f, "element {element} refers to non-existent node {node}")
            }
            Self::OverlappingNodeDofs { node, other_node } => {
                write!(f, "DOFs of node {node} overlap the DOFs of node {other_node}")
            }
            Self::ElementOutOfBounds { element, num_elements } => {
                write!(f, "element {element} is out of bounds for a region with {num_elements} elements")
            }
            Self::DuplicateElement { element } => {
                write!(f, "element {element} appears more than once in the launch order")
            }
            Self::ElementTypeMismatch { expected, actual } => {
                write!(f, "expected a region of {expected} elements, got {actual}")
            }
            Self::DimensionMismatch { what, expected, actual } => {
                write!(f, "{what}: expected dimension {expected}, got {actual}")
            }
            Self::SizeMismatch { what, expected, actual } => {
                write!(f, "{what}: expected length {expected}, got {actual}")
            }
        }
    }
}

impl Error for AssemblyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Constitutive { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Converts a scalar to `f64` for diagnostics. Values that do not fit become NaN.
pub(crate) fn to_f64<T: Real>(value: T) -> f64 {
    value.to_subset().unwrap_or(f64::NAN)
}
