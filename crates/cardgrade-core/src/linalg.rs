use ndarray::{Array1, Array2};

use crate::consts::SINGULAR_DET_EPSILON;
use crate::error::{GradeError, Result};

/// Dense matrix product `a * b`.
pub fn multiply(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let cols_a = a.ncols();
    let rows_b = b.nrows();
    if cols_a != rows_b {
        return Err(GradeError::DimensionMismatch {
            expected: format!("{cols_a} rows on the right operand"),
            found: format!("{rows_b}"),
        });
    }
    Ok(a.dot(b))
}

/// Closed-form cofactor inverse of a 3x3 matrix.
///
/// Returns `Ok(None)` when `|det| < 1e-6`: the transform is degenerate and
/// cannot be inverted meaningfully.
pub fn inverse3x3(m: &Array2<f64>) -> Result<Option<Array2<f64>>> {
    if m.dim() != (3, 3) {
        let (r, c) = m.dim();
        return Err(GradeError::DimensionMismatch {
            expected: "3x3".into(),
            found: format!("{r}x{c}"),
        });
    }

    let (a, b, c) = (m[[0, 0]], m[[0, 1]], m[[0, 2]]);
    let (d, e, f) = (m[[1, 0]], m[[1, 1]], m[[1, 2]]);
    let (g, h, i) = (m[[2, 0]], m[[2, 1]], m[[2, 2]]);

    let det = a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g);
    if det.abs() < SINGULAR_DET_EPSILON || !det.is_finite() {
        return Ok(None);
    }
    let inv_det = 1.0 / det;

    let inv = Array2::from_shape_vec(
        (3, 3),
        vec![
            (e * i - f * h) * inv_det,
            (c * h - b * i) * inv_det,
            (b * f - c * e) * inv_det,
            (f * g - d * i) * inv_det,
            (a * i - c * g) * inv_det,
            (c * d - a * f) * inv_det,
            (d * h - e * g) * inv_det,
            (b * g - a * h) * inv_det,
            (a * e - b * d) * inv_det,
        ],
    )
    .map_err(|e| GradeError::DimensionMismatch {
        expected: "3x3".into(),
        found: e.to_string(),
    })?;

    Ok(Some(inv))
}

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// For each column the row with the largest absolute value in that column is
/// swapped into the pivot position. A pivot of exactly zero means no row can
/// eliminate the column and the system is reported as singular.
pub fn solve_linear_system(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let (n, cols) = a.dim();
    if n != cols {
        return Err(GradeError::DimensionMismatch {
            expected: "square coefficient matrix".into(),
            found: format!("{n}x{cols}"),
        });
    }
    if b.len() != n {
        return Err(GradeError::DimensionMismatch {
            expected: format!("right-hand side of length {n}"),
            found: format!("{}", b.len()),
        });
    }

    // Augmented matrix [A | b]
    let mut m = Array2::<f64>::zeros((n, n + 1));
    m.slice_mut(ndarray::s![.., ..n]).assign(a);
    m.column_mut(n).assign(b);

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_val = m[[k, k]];
        for i in (k + 1)..n {
            if m[[i, k]].abs() > pivot_val.abs() {
                pivot_val = m[[i, k]];
                pivot_row = i;
            }
        }
        if pivot_val == 0.0 {
            return Err(GradeError::SingularSystem);
        }

        if pivot_row != k {
            for j in 0..=n {
                m.swap([k, j], [pivot_row, j]);
            }
        }

        for i in (k + 1)..n {
            let factor = m[[i, k]] / m[[k, k]];
            for j in k..=n {
                m[[i, j]] -= m[[k, j]] * factor;
            }
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += m[[i, j]] * x[j];
        }
        x[i] = (m[[i, n]] - sum) / m[[i, i]];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn multiply_rejects_mismatched_shapes() {
        let a = Array2::<f64>::zeros((2, 3));
        let b = Array2::<f64>::zeros((2, 3));
        assert!(matches!(
            multiply(&a, &b),
            Err(GradeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn multiply_matrix_by_column() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let v = array![[5.0], [6.0]];
        let c = multiply(&a, &v).unwrap();
        assert_eq!(c, array![[17.0], [39.0]]);
    }

    #[test]
    fn inverse_of_identity_is_identity() {
        let id = Array2::<f64>::eye(3);
        assert_eq!(inverse3x3(&id).unwrap().unwrap(), id);
    }

    #[test]
    fn inverse_times_original_is_identity() {
        let m = array![[2.0, 0.5, 1.0], [0.0, 3.0, -1.0], [0.1, 0.2, 1.0]];
        let inv = inverse3x3(&m).unwrap().unwrap();
        let p = multiply(&m, &inv).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((p[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn near_singular_inverse_is_none() {
        let m = array![[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]];
        assert!(inverse3x3(&m).unwrap().is_none());
    }

    #[test]
    fn inverse_rejects_non_3x3() {
        let m = Array2::<f64>::eye(2);
        assert!(inverse3x3(&m).is_err());
    }

    #[test]
    fn solve_needs_pivoting() {
        // Zero in the top-left forces a row swap.
        let a = array![[0.0, 1.0], [2.0, 1.0]];
        let b = array![3.0, 5.0];
        let x = solve_linear_system(&a, &b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn solve_reports_singular_system() {
        let a = array![[1.0, 2.0], [0.0, 0.0]];
        let b = array![1.0, 0.0];
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(GradeError::SingularSystem)
        ));
    }

    #[test]
    fn solve_rejects_wrong_rhs_length() {
        let a = Array2::<f64>::eye(3);
        let b = array![1.0, 2.0];
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(GradeError::DimensionMismatch { .. })
        ));
    }
}
