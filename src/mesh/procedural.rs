//! Basic procedural generation of uniform regions.
//!
//! All generated elements are positively oriented, i.e. the Jacobian determinant of the
//! geometric map is positive everywhere.
use crate::element::ElementType;
use crate::mesh::RegionMesh;
use crate::{real, Real};

/// A uniform mesh of the interval `[0, length]` with `num_cells` segments.
pub fn create_uniform_line_mesh_1d<T: Real>(length: T, num_cells: usize) -> RegionMesh<T> {
    let h = length / real::<T>(num_cells.max(1) as f64);
    let vertices = (0..=num_cells).map(|i| real::<T>(i as f64) * h).collect();
    let connectivity = (0..num_cells).flat_map(|i| [i, i + 1]).collect();
    RegionMesh {
        element_type: ElementType::Segment2,
        dim: 1,
        vertices,
        connectivity,
    }
}

/// Vertices of a uniform grid over `[0, extents[0]] x ... `, first coordinate varying fastest.
fn grid_vertices<T: Real, const D: usize>(extents: [T; D], cells: [usize; D]) -> Vec<T> {
    let num_vertices: usize = cells.iter().map(|c| c + 1).product();
    let mut vertices = Vec::with_capacity(D * num_vertices);
    for linear_idx in 0..num_vertices {
        let mut remainder = linear_idx;
        for k in 0..D {
            let i = remainder % (cells[k] + 1);
            remainder /= cells[k] + 1;
            let h = extents[k] / real::<T>(cells[k].max(1) as f64);
            vertices.push(real::<T>(i as f64) * h);
        }
    }
    vertices
}

/// A uniform quad mesh of the rectangle `[0, width] x [0, height]`.
pub fn create_rectangular_uniform_quad_mesh_2d<T: Real>(
    width: T,
    height: T,
    cells_x: usize,
    cells_y: usize,
) -> RegionMesh<T> {
    let idx = |i: usize, j: usize| (cells_x + 1) * j + i;
    let mut connectivity = Vec::with_capacity(4 * cells_x * cells_y);
    for j in 0..cells_y {
        for i in 0..cells_x {
            connectivity.extend_from_slice(&[idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        }
    }
    RegionMesh {
        element_type: ElementType::Quad4,
        dim: 2,
        vertices: grid_vertices([width, height], [cells_x, cells_y]),
        connectivity,
    }
}

pub fn create_unit_square_uniform_quad_mesh_2d<T: Real>(cells_per_dim: usize) -> RegionMesh<T> {
    create_rectangular_uniform_quad_mesh_2d(T::one(), T::one(), cells_per_dim, cells_per_dim)
}

/// A uniform triangle mesh of the unit square, with every square cell split along its diagonal.
pub fn create_unit_square_uniform_tri_mesh_2d<T: Real>(cells_per_dim: usize) -> RegionMesh<T> {
    let n = cells_per_dim;
    let idx = |i: usize, j: usize| (n + 1) * j + i;
    let mut connectivity = Vec::with_capacity(6 * n * n);
    for j in 0..n {
        for i in 0..n {
            let (v00, v10, v11, v01) = (idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1));
            connectivity.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
        }
    }
    RegionMesh {
        element_type: ElementType::Tri3,
        dim: 2,
        vertices: grid_vertices([T::one(), T::one()], [n, n]),
        connectivity,
    }
}

/// A uniform hex mesh of the box `[0, extents[0]] x [0, extents[1]] x [0, extents[2]]`.
pub fn create_rectangular_uniform_hex_mesh<T: Real>(extents: [T; 3], cells: [usize; 3]) -> RegionMesh<T> {
    let [nx, ny, nz] = cells;
    let idx = |i: usize, j: usize, k: usize| ((nx + 1) * (ny + 1)) * k + (nx + 1) * j + i;
    let mut connectivity = Vec::with_capacity(8 * nx * ny * nz);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                connectivity.extend_from_slice(&[
                    idx(i, j, k),
                    idx(i + 1, j, k),
                    idx(i + 1, j + 1, k),
                    idx(i, j + 1, k),
                    idx(i, j, k + 1),
                    idx(i + 1, j, k + 1),
                    idx(i + 1, j + 1, k + 1),
                    idx(i, j + 1, k + 1),
                ]);
            }
        }
    }
    RegionMesh {
        element_type: ElementType::Hex8,
        dim: 3,
        vertices: grid_vertices(extents, cells),
        connectivity,
    }
}

pub fn create_unit_box_uniform_hex_mesh_3d<T: Real>(cells_per_dim: usize) -> RegionMesh<T> {
    let n = cells_per_dim;
    create_rectangular_uniform_hex_mesh([T::one(), T::one(), T::one()], [n, n, n])
}

/// A uniform tet mesh of the unit cube, with every cube cell split into six tetrahedra
/// around its main diagonal.
pub fn create_unit_box_uniform_tet_mesh_3d<T: Real>(cells_per_dim: usize) -> RegionMesh<T> {
    let n = cells_per_dim;
    let idx = |[i, j, k]: [usize; 3]| ((n + 1) * (n + 1)) * k + (n + 1) * j + i;
    // Axis permutations with their parity. Odd permutations produce negatively oriented
    // tetrahedra unless two vertices are swapped.
    let permutations = [
        ([0, 1, 2], false),
        ([1, 2, 0], false),
        ([2, 0, 1], false),
        ([0, 2, 1], true),
        ([2, 1, 0], true),
        ([1, 0, 2], true),
    ];

    let mut connectivity = Vec::with_capacity(24 * n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for (axes, odd) in permutations {
                    let mut corner = [i, j, k];
                    let v0 = idx(corner);
                    corner[axes[0]] += 1;
                    let v1 = idx(corner);
                    corner[axes[1]] += 1;
                    let v2 = idx(corner);
                    corner[axes[2]] += 1;
                    let v3 = idx(corner);
                    if odd {
                        connectivity.extend_from_slice(&[v0, v2, v1, v3]);
                    } else {
                        connectivity.extend_from_slice(&[v0, v1, v2, v3]);
                    }
                }
            }
        }
    }
    RegionMesh {
        element_type: ElementType::Tet4,
        dim: 3,
        vertices: grid_vertices([T::one(), T::one(), T::one()], [n, n, n]),
        connectivity,
    }
}
