use kernelfem::element::{Hex8, Quad4, ReferenceElement, Segment2, Tet4, Tri3};
use kernelfem::quadrature::{convert_rule, integrate, simplex, tensor, univariate, QuadratureError, QuadraturePair};
use matrixcompare::assert_scalar_eq;

fn reference_measure<E: ReferenceElement<D, N>, const D: usize, const N: usize>() -> f64 {
    let rule: QuadraturePair<f64, D> = E::default_quadrature();
    integrate(&rule, |_| 1.0)
}

#[test]
fn default_rules_integrate_constants_exactly() {
    assert_scalar_eq!(reference_measure::<Segment2, 1, 2>(), 2.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(reference_measure::<Tri3, 2, 3>(), 2.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(reference_measure::<Quad4, 2, 4>(), 4.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(reference_measure::<Tet4, 3, 4>(), 4.0 / 3.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(reference_measure::<Hex8, 3, 8>(), 8.0, comp = abs, tol = 1e-14);
}

#[test]
fn gauss_rules_are_exact_to_degree_2n_minus_1() {
    for n in 1..=3 {
        let rule = convert_rule::<f64, 1>(univariate::gauss(n));
        for degree in 0..2 * n {
            let exact = if degree % 2 == 0 { 2.0 / (degree as f64 + 1.0) } else { 0.0 };
            let approx = integrate(&rule, |x| x[0].powi(degree as i32));
            assert_scalar_eq!(approx, exact, comp = abs, tol = 1e-13);
        }
    }
}

#[test]
fn tensor_rules_integrate_separable_polynomials() {
    // int_{[-1, 1]^2} x^2 y^2 = 4 / 9
    let quad = convert_rule::<f64, 2>(tensor::quadrilateral_gauss(2));
    assert_scalar_eq!(integrate(&quad, |p| p[0].powi(2) * p[1].powi(2)), 4.0 / 9.0, comp = abs, tol = 1e-14);
    // int_{[-1, 1]^3} x^2 z^2 = 8 / 9
    let hex = convert_rule::<f64, 3>(tensor::hexahedron_gauss(2));
    assert_scalar_eq!(integrate(&hex, |p| p[0].powi(2) * p[2].powi(2)), 8.0 / 9.0, comp = abs, tol = 1e-14);
}

#[test]
fn simplex_rules_are_exact_to_degree_2() {
    let triangle = convert_rule::<f64, 2>(simplex::triangle(2).unwrap());
    assert_scalar_eq!(integrate(&triangle, |p| p[0] * p[0]), 2.0 / 3.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&triangle, |p| p[0] + p[1]), -4.0 / 3.0, comp = abs, tol = 1e-14);

    let tetrahedron = convert_rule::<f64, 3>(simplex::tetrahedron(2).unwrap());
    assert_scalar_eq!(integrate(&tetrahedron, |p| p[0] * p[1]), 4.0 / 15.0, comp = abs, tol = 1e-14);
    assert_scalar_eq!(integrate(&tetrahedron, |p| p[2] * p[2]), 8.0 / 15.0, comp = abs, tol = 1e-14);
}

#[test]
fn unavailable_simplex_rules_are_reported() {
    assert_eq!(simplex::triangle(3), Err(QuadratureError::NoRuleAvailable));
    assert_eq!(simplex::tetrahedron(5), Err(QuadratureError::NoRuleAvailable));
}
