use kernelfem::element::{Quad4, Tet4, Tri3};
use kernelfem::nalgebra::{Vector2, Vector3};
use kernelfem::quadrature::convert_rule;
use kernelfem::quadrature::tensor::quadrilateral_gauss;
use kernelfem::space::ElementQuadratureSpace;
use matrixcompare::assert_scalar_eq;
use proptest::prelude::*;

#[test]
fn measure_of_triangle_is_recovered() {
    let space = ElementQuadratureSpace::<f64, Tri3, 2, 3>::new();
    let x = [Vector2::new(1.0, 1.0), Vector2::new(4.0, 1.0), Vector2::new(1.0, 3.0)];
    let area: f64 = (0..space.num_quadrature_points())
        .map(|q| space.evaluate(q, &x).unwrap().scale())
        .sum();
    assert_scalar_eq!(area, 3.0, comp = abs, tol = 1e-13);
}

#[test]
fn inverted_tetrahedron_is_rejected() {
    let space = ElementQuadratureSpace::<f64, Tet4, 3, 4>::new();
    let mut x = [Vector3::zeros(), Vector3::x(), Vector3::y(), Vector3::z()];
    assert!(space.evaluate(0, &x).is_ok());

    x.swap(1, 2);
    let err = space.evaluate(0, &x).unwrap_err();
    assert_eq!(err.quadrature_point, 0);
    assert!(err.determinant < 0.0);
}

#[test]
fn degenerate_quadrilateral_is_rejected() {
    let space = ElementQuadratureSpace::<f64, Quad4, 2, 4>::new();
    let x = [Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::new(2.0, 0.0), Vector2::new(3.0, 0.0)];
    for q in 0..space.num_quadrature_points() {
        let err = space.evaluate(q, &x).unwrap_err();
        assert_eq!(err.quadrature_point, q);
        assert_eq!(err.determinant, 0.0);
    }
}

#[test]
fn custom_quadrature_is_used() {
    let space = ElementQuadratureSpace::<f64, Quad4, 2, 4>::try_with_quadrature(convert_rule(quadrilateral_gauss(3)))
        .unwrap();
    assert_eq!(space.num_quadrature_points(), 9);
    assert_eq!(space.weights().len(), space.points().len());

    let mismatched = (vec![1.0], vec![Vector2::zeros(), Vector2::zeros()]);
    assert!(ElementQuadratureSpace::<f64, Quad4, 2, 4>::try_with_quadrature(mismatched).is_err());
}

proptest! {
    #[test]
    fn affine_fields_have_exact_gradients(
        a in prop::array::uniform3(-3.0..3.0),
        c in -3.0..3.0,
        stretch in 0.5..2.0,
        shear in -0.5..0.5,
    ) {
        // An affine map of the unit tetrahedron with positive orientation
        let x = [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(stretch, 0.0, 0.0),
            Vector3::new(shear, 1.0, 0.0),
            Vector3::new(0.0, shear, stretch),
        ];
        let a = Vector3::from(a);
        let u = x.map(|x_a| a.dot(&x_a) + c);
        let space = ElementQuadratureSpace::<f64, Tet4, 3, 4>::new();
        for q in 0..space.num_quadrature_points() {
            let basis = space.evaluate(q, &x).unwrap();
            let grad_u = basis
                .gradients
                .iter()
                .zip(&u)
                .fold(Vector3::zeros(), |acc, (g, &u_a)| acc + g * u_a);
            prop_assert!((grad_u - a).norm() < 1e-10);
        }
    }
}
