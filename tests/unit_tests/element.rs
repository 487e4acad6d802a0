use kernelfem::element::{map_reference_coords, ElementType, Hex8, Quad4, ReferenceElement, Segment2, Tet4, Tri3};
use kernelfem::nalgebra::{Matrix3, SVector, Vector3};
use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;

fn check_lagrange_property<E: ReferenceElement<D, N>, const D: usize, const N: usize>() {
    // N_a(x_b) = delta_ab
    let nodes = E::reference_nodes::<f64>();
    for (b, x_b) in nodes.iter().enumerate() {
        let values = E::evaluate_basis(x_b);
        for (a, &value) in values.iter().enumerate() {
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_scalar_eq!(value, expected, comp = abs, tol = 1e-14);
        }
    }
}

fn check_partition_of_unity<E: ReferenceElement<D, N>, const D: usize, const N: usize>(xi: &SVector<f64, D>) {
    let sum: f64 = E::evaluate_basis(xi).iter().sum();
    assert_scalar_eq!(sum, 1.0, comp = abs, tol = 1e-14);
    let gradient_sum = E::gradients(xi).iter().fold(SVector::<f64, D>::zeros(), |acc, g| acc + g);
    assert!(gradient_sum.norm() < 1e-14);
}

fn check_gradients_match_finite_differences<E: ReferenceElement<D, N>, const D: usize, const N: usize>(
    xi: &SVector<f64, D>,
) {
    let h = 1e-6;
    let gradients = E::gradients(xi);
    for k in 0..D {
        let mut xi_plus = *xi;
        let mut xi_minus = *xi;
        xi_plus[k] += h;
        xi_minus[k] -= h;
        let plus = E::evaluate_basis(&xi_plus);
        let minus = E::evaluate_basis(&xi_minus);
        for a in 0..N {
            let fd = (plus[a] - minus[a]) / (2.0 * h);
            assert_scalar_eq!(gradients[a][k], fd, comp = abs, tol = 1e-8);
        }
    }
}

fn check_element_table<E: ReferenceElement<D, N>, const D: usize, const N: usize>() {
    let element_type = E::ELEMENT_TYPE;
    assert_eq!(element_type.reference_dim(), D);
    assert_eq!(element_type.num_nodes(), N);
    let (weights, points) = E::default_quadrature::<f64>();
    assert_eq!(weights.len(), points.len());
    assert_eq!(weights.len(), kernelfem::element::num_quadrature_points(element_type));
}

#[test]
fn lagrange_property() {
    check_lagrange_property::<Segment2, 1, 2>();
    check_lagrange_property::<Tri3, 2, 3>();
    check_lagrange_property::<Quad4, 2, 4>();
    check_lagrange_property::<Tet4, 3, 4>();
    check_lagrange_property::<Hex8, 3, 8>();
}

#[test]
fn reference_map_interpolates_nodes() {
    let affine = Matrix3::new(2.0, 0.1, 0.0, 0.0, 1.0, -0.3, 0.2, 0.0, 0.5);
    let offset = Vector3::new(1.0, -2.0, 0.5);
    let x = Hex8::reference_nodes::<f64>().map(|xi| affine * xi + offset);
    for xi in Hex8::reference_nodes::<f64>() {
        let mapped = map_reference_coords::<Hex8, _, 3, 8>(&x, &xi);
        assert!((mapped - (affine * xi + offset)).norm() < 1e-14);
    }
    // Trilinear maps reproduce affine maps everywhere
    let center = map_reference_coords::<Hex8, _, 3, 8>(&x, &Vector3::zeros());
    assert!((center - offset).norm() < 1e-14);
}

#[test]
fn element_tables_are_consistent() {
    check_element_table::<Segment2, 1, 2>();
    check_element_table::<Tri3, 2, 3>();
    check_element_table::<Quad4, 2, 4>();
    check_element_table::<Tet4, 3, 4>();
    check_element_table::<Hex8, 3, 8>();
    assert_eq!(ElementType::ALL.len(), 5);
}

proptest! {
    #[test]
    fn basis_properties_on_reference_cube(x in -1.0..=1.0, y in -1.0..=1.0, z in -1.0..=1.0) {
        check_partition_of_unity::<Segment2, 1, 2>(&SVector::from([x]));
        check_partition_of_unity::<Quad4, 2, 4>(&SVector::from([x, y]));
        check_partition_of_unity::<Hex8, 3, 8>(&SVector::from([x, y, z]));
        check_gradients_match_finite_differences::<Segment2, 1, 2>(&SVector::from([x]));
        check_gradients_match_finite_differences::<Quad4, 2, 4>(&SVector::from([x, y]));
        check_gradients_match_finite_differences::<Hex8, 3, 8>(&SVector::from([x, y, z]));
    }

    #[test]
    fn basis_properties_on_reference_simplices(x in -1.0..=1.0, y in -1.0..=1.0, z in -1.0..=1.0) {
        // Basis properties hold everywhere for linear simplices, not only inside the domain
        check_partition_of_unity::<Tri3, 2, 3>(&SVector::from([x, y]));
        check_partition_of_unity::<Tet4, 3, 4>(&SVector::from([x, y, z]));
        check_gradients_match_finite_differences::<Tri3, 2, 3>(&SVector::from([x, y]));
        check_gradients_match_finite_differences::<Tet4, 3, 4>(&SVector::from([x, y, z]));
    }
}
