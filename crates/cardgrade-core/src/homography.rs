use ndarray::{Array1, Array2};
use tracing::debug;

use crate::consts::{COLLINEAR_EPSILON, PROJECTIVE_W_EPSILON};
use crate::error::{GradeError, Result};
use crate::geometry::{cross, Point2};
use crate::linalg::{inverse3x3, multiply, solve_linear_system};

/// A 3x3 projective transform with `h33` fixed to 1.
#[derive(Clone, Debug, PartialEq)]
pub struct Homography {
    matrix: Array2<f64>,
}

impl Homography {
    /// Estimate the transform taking each `src[i]` to `dst[i]` (DLT, 4 points).
    ///
    /// Each correspondence contributes two rows to an 8x8 system whose
    /// solution is the first eight matrix entries. Degenerate point sets
    /// (coincident or with three collinear points) fail with `SingularSystem`.
    pub fn from_correspondences(src: &[Point2; 4], dst: &[Point2; 4]) -> Result<Self> {
        ensure_general_position(src)?;
        ensure_general_position(dst)?;

        let mut a = Array2::<f64>::zeros((8, 8));
        let mut b = Array1::<f64>::zeros(8);
        for i in 0..4 {
            let Point2 { x, y } = src[i];
            let Point2 { x: u, y: v } = dst[i];

            let r = 2 * i;
            a.row_mut(r)
                .assign(&ndarray::arr1(&[x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y]));
            b[r] = u;

            a.row_mut(r + 1)
                .assign(&ndarray::arr1(&[0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y]));
            b[r + 1] = v;
        }

        let h = solve_linear_system(&a, &b)?;
        if h.iter().any(|v| !v.is_finite()) {
            return Err(GradeError::SingularSystem);
        }

        let matrix = Array2::from_shape_fn((3, 3), |(r, c)| {
            let k = r * 3 + c;
            if k < 8 {
                h[k]
            } else {
                1.0
            }
        });
        debug!(?matrix, "estimated homography");
        Ok(Self { matrix })
    }

    /// Wrap an existing 3x3 matrix.
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Self> {
        if matrix.dim() != (3, 3) {
            let (r, c) = matrix.dim();
            return Err(GradeError::DimensionMismatch {
                expected: "3x3".into(),
                found: format!("{r}x{c}"),
            });
        }
        Ok(Self { matrix })
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// The inverse mapping. A near-zero determinant is reported as
    /// `SingularSystem`, since the corners cannot be rectified.
    pub fn inverse(&self) -> Result<Homography> {
        inverse3x3(&self.matrix)?
            .map(|matrix| Homography { matrix })
            .ok_or(GradeError::SingularSystem)
    }

    /// Map a point, dividing through by the homogeneous coordinate.
    /// `None` when the point maps to infinity.
    pub fn project(&self, p: Point2) -> Option<Point2> {
        let m = &self.matrix;
        let x = m[[0, 0]] * p.x + m[[0, 1]] * p.y + m[[0, 2]];
        let y = m[[1, 0]] * p.x + m[[1, 1]] * p.y + m[[1, 2]];
        let w = m[[2, 0]] * p.x + m[[2, 1]] * p.y + m[[2, 2]];
        if w.abs() < PROJECTIVE_W_EPSILON {
            return None;
        }
        Some(Point2::new(x / w, y / w))
    }

    /// Compose `self` after `other`: the result applies `other` first.
    pub fn compose(&self, other: &Homography) -> Result<Homography> {
        Ok(Homography {
            matrix: multiply(&self.matrix, &other.matrix)?,
        })
    }
}

/// Reject point sets where any three points are (nearly) collinear.
/// Coincident points are a special case of collinearity.
fn ensure_general_position(pts: &[Point2; 4]) -> Result<()> {
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    for (i, j, k) in TRIPLES {
        let (a, b, c) = (pts[i], pts[j], pts[k]);
        let area2 = cross(a, b, c).abs();
        let scale = a.distance(&b).max(a.distance(&c)).max(b.distance(&c));
        if scale == 0.0 || area2 <= COLLINEAR_EPSILON * scale * scale {
            return Err(GradeError::SingularSystem);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: f64) -> [Point2; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(side, 0.0),
            Point2::new(side, side),
            Point2::new(0.0, side),
        ]
    }

    #[test]
    fn identity_for_matching_points() {
        let pts = square(10.0);
        let h = Homography::from_correspondences(&pts, &pts).unwrap();
        let p = h.project(Point2::new(3.0, 7.0)).unwrap();
        assert!((p.x - 3.0).abs() < 1e-9);
        assert!((p.y - 7.0).abs() < 1e-9);
    }

    #[test]
    fn forward_maps_every_corner() {
        let src = [
            Point2::new(12.0, 30.0),
            Point2::new(410.0, 18.0),
            Point2::new(430.0, 590.0),
            Point2::new(5.0, 570.0),
        ];
        let dst = square(1000.0);
        let h = Homography::from_correspondences(&src, &dst).unwrap();
        for i in 0..4 {
            let p = h.project(src[i]).unwrap();
            assert!((p.x - dst[i].x).abs() < 1e-6, "corner {i}: {p:?}");
            assert!((p.y - dst[i].y).abs() < 1e-6, "corner {i}: {p:?}");
        }
    }

    #[test]
    fn coincident_points_are_singular() {
        let src = [Point2::new(5.0, 5.0); 4];
        let dst = square(100.0);
        assert!(matches!(
            Homography::from_correspondences(&src, &dst),
            Err(GradeError::SingularSystem)
        ));
    }

    #[test]
    fn compose_with_inverse_is_identity() {
        let src = [
            Point2::new(0.0, 0.0),
            Point2::new(90.0, 10.0),
            Point2::new(100.0, 80.0),
            Point2::new(-5.0, 95.0),
        ];
        let h = Homography::from_correspondences(&src, &square(50.0)).unwrap();
        let id = h.compose(&h.inverse().unwrap()).unwrap();
        let p = id.project(Point2::new(17.0, 23.0)).unwrap();
        assert!((p.x - 17.0).abs() < 1e-9);
        assert!((p.y - 23.0).abs() < 1e-9);
    }
}
