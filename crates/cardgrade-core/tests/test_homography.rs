use approx::assert_abs_diff_eq;

use cardgrade_core::error::GradeError;
use cardgrade_core::geometry::Point2;
use cardgrade_core::homography::Homography;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> [Point2; 4] {
    [
        Point2::new(x0, y0),
        Point2::new(x1, y0),
        Point2::new(x1, y1),
        Point2::new(x0, y1),
    ]
}

fn assert_maps(h: &Homography, from: &[Point2; 4], to: &[Point2; 4], eps: f64) {
    for (f, t) in from.iter().zip(to.iter()) {
        let p = h.project(*f).unwrap();
        assert_abs_diff_eq!(p.x, t.x, epsilon = eps);
        assert_abs_diff_eq!(p.y, t.y, epsilon = eps);
    }
}

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

#[test]
fn test_axis_aligned_rect_inverse_maps_back() {
    let src = rect(100.0, 100.0, 900.0, 900.0);
    let dst = rect(0.0, 0.0, 1000.0, 1000.0);

    let h = Homography::from_correspondences(&src, &dst).unwrap();
    assert_maps(&h, &src, &dst, 1e-6);

    let inv = h.inverse().unwrap();
    assert_maps(&inv, &dst, &src, 1e-6);
}

#[test]
fn test_perspective_quad() {
    let src = [
        Point2::new(120.0, 80.0),
        Point2::new(870.0, 140.0),
        Point2::new(820.0, 960.0),
        Point2::new(90.0, 900.0),
    ];
    let dst = rect(0.0, 0.0, 1000.0, 1400.0);

    let h = Homography::from_correspondences(&src, &dst).unwrap();
    assert_maps(&h, &src, &dst, 1e-6);
    assert_abs_diff_eq!(h.matrix()[[2, 2]], 1.0);

    // A point inside the source lands inside the destination rectangle.
    let mid = h.project(Point2::new(470.0, 520.0)).unwrap();
    assert!(mid.x > 0.0 && mid.x < 1000.0);
    assert!(mid.y > 0.0 && mid.y < 1400.0);
}

#[test]
fn test_compose_with_inverse_is_identity() {
    let src = [
        Point2::new(10.0, 20.0),
        Point2::new(300.0, 5.0),
        Point2::new(320.0, 410.0),
        Point2::new(0.0, 380.0),
    ];
    let dst = rect(0.0, 0.0, 200.0, 300.0);
    let h = Homography::from_correspondences(&src, &dst).unwrap();
    let id = h.compose(&h.inverse().unwrap()).unwrap();

    let p = id.project(Point2::new(77.0, 33.0)).unwrap();
    assert_abs_diff_eq!(p.x, 77.0, epsilon = 1e-6);
    assert_abs_diff_eq!(p.y, 33.0, epsilon = 1e-6);
}

// ---------------------------------------------------------------------------
// Degenerate inputs
// ---------------------------------------------------------------------------

#[test]
fn test_three_collinear_points_are_singular() {
    let src = [
        Point2::new(0.0, 0.0),
        Point2::new(50.0, 0.0),
        Point2::new(100.0, 0.0),
        Point2::new(0.0, 100.0),
    ];
    let dst = rect(0.0, 0.0, 100.0, 100.0);
    assert!(matches!(
        Homography::from_correspondences(&src, &dst),
        Err(GradeError::SingularSystem)
    ));
    // Same with the roles swapped.
    assert!(matches!(
        Homography::from_correspondences(&dst, &src),
        Err(GradeError::SingularSystem)
    ));
}

#[test]
fn test_nearly_collinear_points_are_singular() {
    let src = [
        Point2::new(0.0, 0.0),
        Point2::new(500.0, 1e-8),
        Point2::new(1000.0, 0.0),
        Point2::new(0.0, 1000.0),
    ];
    let dst = rect(0.0, 0.0, 100.0, 100.0);
    assert!(matches!(
        Homography::from_correspondences(&src, &dst),
        Err(GradeError::SingularSystem)
    ));
}

#[test]
fn test_coincident_points_are_singular() {
    let p = Point2::new(5.0, 5.0);
    let dst = rect(0.0, 0.0, 100.0, 100.0);
    assert!(matches!(
        Homography::from_correspondences(&[p; 4], &dst),
        Err(GradeError::SingularSystem)
    ));
}

#[test]
fn test_from_matrix_rejects_wrong_shape() {
    let m = ndarray::Array2::<f64>::eye(2);
    assert!(matches!(
        Homography::from_matrix(m),
        Err(GradeError::DimensionMismatch { .. })
    ));
}
