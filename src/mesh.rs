//! Homogeneous element regions.
use crate::assembly::local::ElementConnectivityAssembler;
use crate::element::ElementType;
use crate::error::AssemblyError;
use crate::Real;
use nalgebra::SVector;
use serde::{Deserialize, Serialize};

pub mod procedural;

/// A region of elements that all share the same element type.
///
/// Vertex coordinates are stored flattened with a runtime spatial dimension, and connectivity
/// is stored flattened with `element_type.num_nodes()` entries per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMesh<T> {
    element_type: ElementType,
    dim: usize,
    vertices: Vec<T>,
    connectivity: Vec<usize>,
}

impl<T: Real> RegionMesh<T> {
    pub fn try_new(
        element_type: ElementType,
        dim: usize,
        vertices: Vec<T>,
        connectivity: Vec<usize>,
    ) -> Result<Self, AssemblyError> {
        if dim == 0 || vertices.len() % dim != 0 {
            return Err(AssemblyError::DimensionMismatch {
                what: "flattened vertex coordinates",
                expected: dim,
                actual: vertices.len(),
            });
        }
        let nodes_per_element = element_type.num_nodes();
        if connectivity.len() % nodes_per_element != 0 {
            return Err(AssemblyError::SizeMismatch {
                what: "flattened connectivity",
                expected: connectivity.len() - connectivity.len() % nodes_per_element,
                actual: connectivity.len(),
            });
        }
        let num_vertices = vertices.len() / dim;
        let out_of_bounds = connectivity
            .iter()
            .position(|&node| node >= num_vertices);
        if let Some(position) = out_of_bounds {
            return Err(AssemblyError::InvalidConnectivity {
                element: position / nodes_per_element,
                node: connectivity[position],
            });
        }

        Ok(Self {
            element_type,
            dim,
            vertices,
            connectivity,
        })
    }

    /// Constructs a region from statically sized vertices and elements.
    pub fn from_vertices_and_connectivity<const D: usize, const N: usize>(
        element_type: ElementType,
        vertices: &[SVector<T, D>],
        elements: &[[usize; N]],
    ) -> Result<Self, AssemblyError> {
        if element_type.num_nodes() != N {
            return Err(AssemblyError::SizeMismatch {
                what: "nodes per element",
                expected: element_type.num_nodes(),
                actual: N,
            });
        }
        let flat_vertices = vertices.iter().flat_map(|v| v.iter().copied()).collect();
        let flat_connectivity = elements.iter().flatten().copied().collect();
        Self::try_new(element_type, D, flat_vertices, flat_connectivity)
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// The spatial dimension of the vertex coordinates.
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / self.dim
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len() / self.element_type.num_nodes()
    }

    pub fn vertex_coords(&self, vertex: usize) -> &[T] {
        &self.vertices[self.dim * vertex..self.dim * (vertex + 1)]
    }

    pub fn vertex_coords_mut(&mut self, vertex: usize) -> &mut [T] {
        &mut self.vertices[self.dim * vertex..self.dim * (vertex + 1)]
    }

    pub fn element_nodes(&self, element: usize) -> &[usize] {
        let n = self.element_type.num_nodes();
        &self.connectivity[n * element..n * (element + 1)]
    }

    /// Reorders the nodes of an element.
    ///
    /// # Panics
    ///
    /// Panics if `permutation` is not a permutation of the element's local node indices.
    pub fn permute_element_nodes(&mut self, element: usize, permutation: &[usize]) {
        let n = self.element_type.num_nodes();
        assert_eq!(permutation.len(), n, "Permutation must cover all element nodes");
        let nodes = &mut self.connectivity[n * element..n * (element + 1)];
        let original = nodes.to_vec();
        for (node, &p) in nodes.iter_mut().zip(permutation) {
            *node = original[p];
        }
    }

    /// Gathers the coordinates of the element's nodes.
    ///
    /// # Panics
    ///
    /// Panics if `D` is not the spatial dimension or `N` is not the node count of the region.
    #[inline]
    pub fn gather_element_vertices<const D: usize, const N: usize>(&self, element: usize) -> [SVector<T, D>; N] {
        assert_eq!(D, self.dim, "Dimension must match region dimension");
        assert_eq!(N, self.element_type.num_nodes(), "Node count must match element type");
        let nodes = self.element_nodes(element);
        std::array::from_fn(|a| SVector::from_column_slice(self.vertex_coords(nodes[a])))
    }
}

impl<T: Real> ElementConnectivityAssembler for RegionMesh<T> {
    fn num_elements(&self) -> usize {
        self.num_elements()
    }

    fn num_nodes(&self) -> usize {
        self.num_vertices()
    }

    fn element_node_count(&self, _element_index: usize) -> usize {
        self.element_type.num_nodes()
    }

    fn populate_element_nodes(&self, output: &mut [usize], element_index: usize) {
        output.copy_from_slice(self.element_nodes(element_index));
    }
}
