use kernelfem::assembly::global::{assemble_pattern, par_assemble_pattern, AssemblyTarget, GlobalSystem};
use kernelfem::dof::DofMap;
use kernelfem::error::AssemblyError;
use kernelfem::mesh::procedural::{create_uniform_line_mesh_1d, create_unit_square_uniform_quad_mesh_2d};
use kernelfem::nalgebra::DMatrix;
use kernelfem::nalgebra_sparse::pattern::SparsityPattern;
use proptest::prelude::*;

#[test]
fn line_mesh_pattern() {
    let mesh = create_uniform_line_mesh_1d(1.0, 2);
    let dofs = DofMap::contiguous(3, 1);
    let pattern = assemble_pattern(&mesh, &dofs).unwrap();
    let expected = SparsityPattern::try_from_offsets_and_indices(3, 3, vec![0, 2, 5, 7], vec![0, 1, 0, 1, 2, 1, 2])
        .unwrap();
    assert_eq!(pattern, expected);
}

#[test]
fn pattern_only_contains_owned_rows() {
    let mesh = create_uniform_line_mesh_1d(1.0, 4);
    let dofs = DofMap::contiguous(5, 2).with_ownership(4..6).unwrap();
    let pattern = assemble_pattern(&mesh, &dofs).unwrap();
    assert_eq!(pattern.major_dim(), 2);
    assert_eq!(pattern.minor_dim(), 10);
    // Node 2 couples to nodes 1, 2 and 3
    assert_eq!(pattern.lane(0), &[2, 3, 4, 5, 6, 7]);
    assert_eq!(pattern.lane(1), &[2, 3, 4, 5, 6, 7]);
}

#[test]
fn pattern_rejects_mismatched_dof_map() {
    let mesh = create_uniform_line_mesh_1d(1.0, 2);
    let dofs = DofMap::contiguous(4, 1);
    assert!(matches!(
        assemble_pattern(&mesh, &dofs),
        Err(AssemblyError::SizeMismatch { expected: 3, actual: 4, .. })
    ));
    assert!(par_assemble_pattern(&mesh, &dofs).is_err());
}

#[test]
fn global_system_rejects_entries_outside_pattern() {
    let mesh = create_uniform_line_mesh_1d(1.0, 4);
    let dofs = DofMap::contiguous(5, 1).with_ownership(2..4).unwrap();
    let system = GlobalSystem::from_mesh(&mesh, &dofs).unwrap();
    assert_eq!(system.rank_offset(), 2);
    assert_eq!(system.num_local_rows(), 2);

    system.add_to_row(0, &[3, 1, 2], &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(
        system.add_to_row(0, &[4], &[1.0]),
        Err(AssemblyError::UntrackedEntry { row: 2, column: 4 })
    );
    assert_eq!(
        system.add_to_row(2, &[2], &[1.0]),
        Err(AssemblyError::RowOutOfBounds { row: 2, num_rows: 2 })
    );
    assert_eq!(
        system.add_to_entry(5, 1.0),
        Err(AssemblyError::RowOutOfBounds { row: 5, num_rows: 2 })
    );

    assert_eq!(system.matrix_entry(0, 1), Some(2.0));
    assert_eq!(system.matrix_entry(0, 4), None);
}

#[test]
fn global_system_finalize_and_reuse() {
    let mesh = create_uniform_line_mesh_1d(1.0, 2);
    let dofs = DofMap::contiguous(3, 1);
    let mut system = GlobalSystem::<f64>::from_mesh(&mesh, &dofs).unwrap();

    system.add_to_row(1, &[2, 0], &[4.0, 1.0]).unwrap();
    system.add_to_row(1, &[0], &[1.0]).unwrap();
    system.add_to_entry(2, -1.0).unwrap();

    let (matrix, residual) = system.finalize();
    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(3, 3, &[
        0.0, 0.0, 0.0,
        2.0, 0.0, 4.0,
        0.0, 0.0, 0.0,
    ]);
    assert_eq!(DMatrix::from(&matrix), expected);
    assert_eq!(residual.as_slice(), &[0.0, 0.0, -1.0]);
    assert_eq!(matrix.pattern(), system.pattern());

    system.begin_pass();
    let (matrix, residual) = system.finalize();
    assert!(matrix.values().iter().all(|&v| v == 0.0));
    assert!(residual.iter().all(|&v| v == 0.0));
}

proptest! {
    #[test]
    fn serial_and_parallel_patterns_agree(
        cells in 1..5usize,
        dofs_per_node in 1..4usize,
        (begin, end) in (0.0..1.0f64, 0.0..1.0f64),
    ) {
        let mesh = create_unit_square_uniform_quad_mesh_2d::<f64>(cells);
        let num_dofs = dofs_per_node * mesh.num_vertices();
        let (begin, end) = (begin * num_dofs as f64, end * num_dofs as f64);
        let owned = (begin.min(end) as usize)..(begin.max(end) as usize);
        let dofs = DofMap::contiguous(mesh.num_vertices(), dofs_per_node)
            .with_ownership(owned.clone())
            .unwrap();

        let pattern = assemble_pattern(&mesh, &dofs).unwrap();
        let par_pattern = par_assemble_pattern(&mesh, &dofs).unwrap();
        prop_assert_eq!(&pattern, &par_pattern);
        prop_assert_eq!(pattern.major_dim(), owned.len());
        prop_assert_eq!(pattern.minor_dim(), num_dofs);
        // Every owned DOF couples at least to its own node
        for row in 0..pattern.major_dim() {
            prop_assert!(pattern.lane(row).contains(&(row + owned.start)));
        }
    }
}
