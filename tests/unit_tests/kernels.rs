use crate::unit_tests::DenseTarget;
use kernelfem::assembly::launcher::launch_serial;
use kernelfem::assembly::local::{ElementKernel, LocalStack, StackState};
use kernelfem::constitutive::{ConstantConductivity, LinearElasticMaterial, TemperatureDependentConductivity, YoungPoisson};
use kernelfem::dof::DofMap;
use kernelfem::element::{Hex8, Quad4, Segment2, Tet4};
use kernelfem::kernels::{DiffusionKernel, ElasticityKernel};
use kernelfem::mesh::procedural::{
    create_uniform_line_mesh_1d, create_unit_box_uniform_hex_mesh_3d, create_unit_box_uniform_tet_mesh_3d,
    create_unit_square_uniform_quad_mesh_2d,
};
use kernelfem::mesh::RegionMesh;
use kernelfem::nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use kernelfem::settings::ReductionOp;
use matrixcompare::assert_matrix_eq;
use proptest::prelude::*;

/// Assembles a kernel serially into a dense residual and Jacobian.
fn assemble_dense<K: ElementKernel<f64>>(kernel: &K, num_dofs: usize) -> (DMatrix<f64>, DVector<f64>) {
    let target = DenseTarget::new(num_dofs, num_dofs);
    launch_serial(kernel, &target, ReductionOp::Max).unwrap();
    (target.matrix(), target.residual())
}

fn field_on_vertices(mesh: &RegionMesh<f64>, components: usize, f: impl Fn(&[f64], usize) -> f64) -> Vec<f64> {
    (0..mesh.num_vertices())
        .flat_map(|v| (0..components).map(move |i| (v, i)))
        .map(|(v, i)| f(mesh.vertex_coords(v), i))
        .collect()
}

#[test]
fn one_dimensional_diffusion_matches_hand_computation() {
    // Two unit cells with u = 3x + 1 and k = 1.5, so the flux is 4.5 everywhere
    let mesh = create_uniform_line_mesh_1d(2.0, 2);
    let dofs = DofMap::contiguous(3, 1);
    let u = field_on_vertices(&mesh, 1, |x, _| 3.0 * x[0] + 1.0);
    let law = ConstantConductivity { conductivity: 1.5 };
    let kernel = DiffusionKernel::<f64, Segment2, _, 1, 2>::try_new(&mesh, &dofs, &u, law).unwrap();

    let (jacobian, residual) = assemble_dense(&kernel, 3);
    #[rustfmt::skip]
    let expected_jacobian = DMatrix::from_row_slice(3, 3, &[
        1.5, -1.5, 0.0,
        -1.5, 3.0, -1.5,
        0.0, -1.5, 1.5,
    ]);
    assert_matrix_eq!(jacobian, expected_jacobian, comp = abs, tol = 1e-12);
    // Interior residual vanishes, boundary residuals are the outward fluxes
    assert_matrix_eq!(residual, DVector::from_vec(vec![-4.5, 0.0, 4.5]), comp = abs, tol = 1e-12);
}

#[test]
fn stack_moves_through_element_phases() {
    let mesh = create_uniform_line_mesh_1d(2.0, 2);
    let dofs = DofMap::contiguous(3, 1);
    let u = [1.0, 2.0, 4.0];
    let law = ConstantConductivity { conductivity: 1.0 };
    let kernel = DiffusionKernel::<f64, Segment2, _, 1, 2>::try_new(&mesh, &dofs, &u, law).unwrap();
    let target = DenseTarget::new(3, 3);

    let mut stack = kernel.create_stack();
    assert_eq!(stack.state(), StackState::Uninitialized);
    for element in 0..mesh.num_elements() {
        kernel.setup(element, &mut stack).unwrap();
        assert_eq!(stack.state(), StackState::SetUp);
        assert_eq!(stack.u_local[0][0], u[element]);
        assert!(stack.residual.iter().all(|r| r[0] == 0.0));
        for q in 0..kernel.num_quadrature_points() {
            kernel.quadrature_point_compute(element, q, &mut stack).unwrap();
            assert_eq!(stack.state(), StackState::Accumulating);
        }
        kernel.complete(element, &mut stack, &target).unwrap();
        assert_eq!(stack.state(), StackState::Completed);
    }
    // Flux 1 on the left cell, 2 on the right cell
    assert_matrix_eq!(target.residual(), DVector::from_vec(vec![-1.0, -1.0, 2.0]), comp = abs, tol = 1e-12);
}

#[test]
fn source_is_distributed_to_nodes() {
    let mesh = create_unit_square_uniform_quad_mesh_2d(2);
    let dofs = DofMap::contiguous(mesh.num_vertices(), 1);
    let u = vec![0.0; dofs.num_global_dofs()];
    let law = ConstantConductivity { conductivity: 1.0 };
    let kernel = DiffusionKernel::<f64, Quad4, _, 2, 4>::try_new(&mesh, &dofs, &u, law)
        .unwrap()
        .with_source(2.0);
    let (_, residual) = assemble_dense(&kernel, dofs.num_global_dofs());
    // The nodal source contributions sum to f times the area
    assert!((residual.sum() + 2.0).abs() < 1e-12);
    // The center node collects a quarter of every element
    assert!((residual[4] + 0.5).abs() < 1e-12);
}

#[test]
fn linear_diffusion_residual_is_jacobian_times_solution() {
    let mesh = create_unit_box_uniform_hex_mesh_3d(2);
    let dofs = DofMap::contiguous(mesh.num_vertices(), 1);
    let u = field_on_vertices(&mesh, 1, |x, _| (x[0] * 2.0).cos() * x[1] + x[2]);
    let law = ConstantConductivity { conductivity: 0.7 };
    let kernel = DiffusionKernel::<f64, Hex8, _, 3, 8>::try_new(&mesh, &dofs, &u, law).unwrap();

    let (jacobian, residual) = assemble_dense(&kernel, dofs.num_global_dofs());
    let u = DVector::from_vec(u);
    assert_matrix_eq!(residual, &jacobian * &u, comp = abs, tol = 1e-12);
    assert_matrix_eq!(jacobian, jacobian.transpose(), comp = abs, tol = 1e-12);
    // Constant fields are in the null space
    let ones = DVector::repeat(u.len(), 1.0);
    assert!((&jacobian * ones).amax() < 1e-12);
}

#[test]
fn quadrature_point_order_does_not_change_result() {
    let mesh = create_unit_square_uniform_quad_mesh_2d(3);
    let dofs = DofMap::contiguous(mesh.num_vertices(), 1);
    let u = field_on_vertices(&mesh, 1, |x, _| x[0] * x[1]);
    let law = TemperatureDependentConductivity {
        reference_conductivity: 1.0,
        coefficient: 2.0,
    };
    let kernel = DiffusionKernel::<f64, Quad4, _, 2, 4>::try_new(&mesh, &dofs, &u, law)
        .unwrap()
        .with_source(1.0);
    let n = dofs.num_global_dofs();

    let (ascending_jacobian, ascending_residual) = assemble_dense(&kernel, n);

    let descending = DenseTarget::new(n, n);
    let mut stack = kernel.create_stack();
    for element in 0..mesh.num_elements() {
        kernel.setup(element, &mut stack).unwrap();
        for q in (0..kernel.num_quadrature_points()).rev() {
            kernel.quadrature_point_compute(element, q, &mut stack).unwrap();
        }
        kernel.complete(element, &mut stack, &descending).unwrap();
    }

    assert_matrix_eq!(descending.matrix(), ascending_jacobian, comp = abs, tol = 1e-13);
    assert_matrix_eq!(descending.residual(), ascending_residual, comp = abs, tol = 1e-13);
}

#[test]
fn rigid_motions_produce_no_elastic_forces() {
    let mesh = create_unit_box_uniform_tet_mesh_3d(2);
    let dofs = DofMap::contiguous(mesh.num_vertices(), 3);
    let material = LinearElasticMaterial::new(YoungPoisson {
        young: 1e4,
        poisson: 0.25,
    });
    let translation = Vector3::new(0.3, -0.2, 1.0);
    // Infinitesimal rotation
    let skew = Matrix3::new(0.0, -0.1, 0.2, 0.1, 0.0, -0.3, -0.2, 0.3, 0.0);

    let u = field_on_vertices(&mesh, 3, |x, i| translation[i] + (skew * Vector3::from_column_slice(x))[i]);
    let kernel = ElasticityKernel::<f64, Tet4, _, 3, 4>::try_new(&mesh, &dofs, &u, material).unwrap();
    let (jacobian, residual) = assemble_dense(&kernel, dofs.num_global_dofs());
    assert!(residual.amax() < 1e-9);
    assert_matrix_eq!(jacobian, jacobian.transpose(), comp = abs, tol = 1e-9);
    assert!(jacobian.diagonal().iter().all(|&d| d > 0.0));
}

#[test]
fn body_force_balances_total_load() {
    let mesh = create_unit_square_uniform_quad_mesh_2d(3);
    let dofs = DofMap::contiguous(mesh.num_vertices(), 2);
    let u = vec![0.0; dofs.num_global_dofs()];
    let material = LinearElasticMaterial::new(YoungPoisson {
        young: 10.0,
        poisson: 0.3,
    });
    let kernel = ElasticityKernel::<f64, Quad4, _, 2, 4>::try_new(&mesh, &dofs, &u, material)
        .unwrap()
        .with_body_force([0.0, -9.81].into());
    let (_, residual) = assemble_dense(&kernel, dofs.num_global_dofs());
    let total_x: f64 = residual.iter().step_by(2).sum();
    let total_y: f64 = residual.iter().skip(1).step_by(2).sum();
    assert!(total_x.abs() < 1e-12);
    assert!((total_y - 9.81).abs() < 1e-12);
}

proptest! {
    #[test]
    fn elastic_residual_is_jacobian_times_displacement(
        values in prop::collection::vec(-1.0..1.0f64, 2 * 9),
        poisson in 0.0..0.45f64,
    ) {
        let mesh = create_unit_square_uniform_quad_mesh_2d(2);
        let dofs = DofMap::contiguous(mesh.num_vertices(), 2);
        let material = LinearElasticMaterial::new(YoungPoisson { young: 5.0, poisson });
        let kernel = ElasticityKernel::<f64, Quad4, _, 2, 4>::try_new(&mesh, &dofs, &values, material).unwrap();
        let (jacobian, residual) = assemble_dense(&kernel, dofs.num_global_dofs());
        let u = DVector::from_vec(values.clone());
        prop_assert!((residual - &jacobian * u).amax() < 1e-10);
        prop_assert!((&jacobian - jacobian.transpose()).amax() < 1e-10);
    }

    #[test]
    fn nonlinear_diffusion_jacobian_matches_finite_differences(
        values in prop::collection::vec(0.0..1.0f64, 16),
        coefficient in -0.5..2.0f64,
    ) {
        let mesh = create_unit_square_uniform_quad_mesh_2d(3);
        let dofs = DofMap::contiguous(mesh.num_vertices(), 1);
        let law = TemperatureDependentConductivity { reference_conductivity: 1.3, coefficient };
        let n = dofs.num_global_dofs();
        let residual_at = |u: &[f64]| {
            let kernel = DiffusionKernel::<f64, Quad4, _, 2, 4>::try_new(&mesh, &dofs, u, law)
                .unwrap()
                .with_source(0.5);
            assemble_dense(&kernel, n)
        };

        let (jacobian, _) = residual_at(&values);
        let h = 1e-6;
        for j in 0..n {
            let mut plus = values.clone();
            let mut minus = values.clone();
            plus[j] += h;
            minus[j] -= h;
            let fd_column = (residual_at(&plus).1 - residual_at(&minus).1) / (2.0 * h);
            prop_assert!((fd_column - jacobian.column(j)).amax() < 1e-7);
        }
    }
}
