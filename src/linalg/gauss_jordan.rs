use crate::{
    error::{Error, Result},
    linalg::Matrix,
    value::Value,
};

/// Full-pivot Gauss-Jordan elimination.
///
/// Solves `A·X = B` for `X`, where `A` is `n × n` and `B` is `n × m`; every column of
/// `B` is an independent right-hand side. Both matrices are consumed in place:
/// - `A` is replaced by its inverse `A⁻¹`.
/// - `B` is replaced by the solution `X`.
///
/// Copy the inputs beforehand if the original values are still needed.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// Each of the `n` passes searches every row and column not yet used as a pivot for
/// the largest absolute value (full pivoting), swaps that row onto the diagonal,
/// normalizes it, and eliminates the pivot column from every other row. The inverse
/// is accumulated in the storage of `A` as elimination proceeds; because pivots are
/// chosen off-diagonal, its columns come out permuted, and a final pass replays the
/// recorded row/column pairs in reverse to restore column order.
/// </div>
///
/// # Example
/// ```rust
/// # use lsqfit::linalg::{GaussJordan, Matrix};
/// let original = Matrix::from_rows(&[[0.0, 2.0], [3.0, 1.0]]).unwrap();
///
/// let mut a = original.clone();
/// let mut b = Matrix::identity(2);
/// GaussJordan::solve(&mut a, &mut b).unwrap();
///
/// // Both now hold the inverse
/// assert!(a.approx_eq(&b, 1e-12));
/// assert!(original.multiply(&b).unwrap().approx_eq(&Matrix::identity(2), 1e-12));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussJordan;
impl GaussJordan {
    /// Solves `a · X = b`, leaving `a⁻¹` in `a` and `X` in `b`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if `a` is not square or `b` has a different row count.
    /// - [`Error::SingularMatrix`] if no usable pivot remains, or a pivot is exactly zero.
    ///
    /// On error the contents of both matrices are unspecified.
    pub fn solve<T: Value>(a: &mut Matrix<T>, b: &mut Matrix<T>) -> Result<()> {
        let n = a.rows();
        if !a.is_square() {
            return Err(Error::DimensionMismatch {
                context: "Gauss-Jordan coefficient matrix must be square",
                expected: n,
                found: a.columns(),
            });
        }
        if b.rows() != n {
            return Err(Error::DimensionMismatch {
                context: "Gauss-Jordan right-hand side rows",
                expected: n,
                found: b.rows(),
            });
        }

        // How often each index has served as a pivot column
        let mut pivot_usage = vec![0_usize; n];

        // indxr / indxc: where each pass found its pivot
        let mut pivot_rows = vec![0_usize; n];
        let mut pivot_columns = vec![0_usize; n];

        for pass in 0..n {
            let (row, column) = Self::find_pivot(a, &pivot_usage)?;
            pivot_usage[column] += 1;

            // Move the pivot onto the diagonal
            if row != column {
                a.interchange_rows(row, column)?;
                b.interchange_rows(row, column)?;
            }
            pivot_rows[pass] = row;
            pivot_columns[pass] = column;

            let pivot = a.get(column, column)?;
            if pivot == T::zero() {
                return Err(Error::SingularMatrix);
            }

            // The inverse is built in place: the pivot cell becomes 1/pivot
            let inverse_pivot = T::one() / pivot;
            a.set(column, column, T::one())?;
            a.multiply_row_by(column, inverse_pivot)?;
            b.multiply_row_by(column, inverse_pivot)?;

            for other in (0..n).filter(|&r| r != column) {
                let factor = a.get(other, column)?;
                if factor == T::zero() {
                    continue;
                }

                a.set(other, column, T::zero())?;
                a.add_multiple_of_row(-factor, column, other)?;
                b.add_multiple_of_row(-factor, column, other)?;
            }
        }

        // Undo the column permutation, last swap first
        for pass in (0..n).rev() {
            if pivot_rows[pass] != pivot_columns[pass] {
                a.interchange_columns(pivot_rows[pass], pivot_columns[pass])?;
            }
        }

        Ok(())
    }

    /// Largest-magnitude entry among rows and columns not yet pivoted on.
    fn find_pivot<T: Value>(a: &Matrix<T>, pivot_usage: &[usize]) -> Result<(usize, usize)> {
        let n = pivot_usage.len();
        let mut best: Option<(T, usize, usize)> = None;

        for row in (0..n).filter(|&r| pivot_usage[r] != 1) {
            for column in 0..n {
                match pivot_usage[column] {
                    0 => {
                        let magnitude = Value::abs(a.get(row, column)?);
                        let is_better = match best {
                            Some((biggest, _, _)) => magnitude > biggest,
                            None => magnitude > T::zero(),
                        };
                        if is_better {
                            best = Some((magnitude, row, column));
                        }
                    }
                    1 => {}
                    _ => return Err(Error::SingularMatrix),
                }
            }
        }

        best.map(|(_, row, column)| (row, column))
            .ok_or(Error::SingularMatrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_all_close;

    #[test]
    fn test_identity_leaves_b_unchanged() {
        let mut a = Matrix::<f64>::identity(3);
        let original = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        let mut b = original.clone();
        GaussJordan::solve(&mut a, &mut b).unwrap();
        assert_eq!(b, original);
        assert_eq!(a, Matrix::identity(3));
    }

    #[test]
    fn test_inverse_times_original_is_identity() {
        let original = Matrix::from_rows(&[
            [2.0, -1.0, 0.0, 4.0],
            [1.0, 3.0, -2.0, 0.5],
            [0.0, 5.0, 1.0, -3.0],
            [7.0, 0.0, 2.0, 1.0],
        ])
        .unwrap();

        let mut a = original.clone();
        let mut b = Matrix::identity(4);
        GaussJordan::solve(&mut a, &mut b).unwrap();

        let product = original.multiply(&b).unwrap();
        assert!(product.approx_eq(&Matrix::identity(4), 1e-12));

        // In-place inverse agrees with the solved right-hand side
        assert!(a.approx_eq(&b, 1e-12));
    }

    #[test]
    fn test_off_diagonal_pivots_are_unscrambled() {
        // The largest entries sit off the diagonal, forcing column permutations
        let original =
            Matrix::from_rows(&[[0.0, 1.0, 9.0], [8.0, 0.5, 0.0], [0.25, 7.0, 1.0]]).unwrap();

        let mut a = original.clone();
        let mut b = Matrix::from_rows(&[[10.0], [8.5], [8.25]]).unwrap();
        GaussJordan::solve(&mut a, &mut b).unwrap();

        let x: Vec<f64> = b.to_rows().into_iter().flatten().collect();
        assert_all_close!(x, [1.0, 1.0, 1.0], 1e-12);

        let product = original.multiply(&a).unwrap();
        assert!(product.approx_eq(&Matrix::identity(3), 1e-12));
    }

    #[test]
    fn test_multiple_right_hand_sides() {
        let mut a = Matrix::from_rows(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
        let mut b = Matrix::from_rows(&[[3.0, 1.0], [5.0, 2.0]]).unwrap();
        GaussJordan::solve(&mut a, &mut b).unwrap();

        let solved = Matrix::from_rows(&[[0.8, 0.2], [1.4, 0.6]]).unwrap();
        assert!(b.approx_eq(&solved, 1e-12));
    }

    #[test]
    fn test_zero_row_is_singular() {
        let mut a = Matrix::from_rows(&[[1.0, 2.0], [0.0, 0.0]]).unwrap();
        let mut b = Matrix::from_rows(&[[1.0], [1.0]]).unwrap();
        assert_eq!(
            GaussJordan::solve(&mut a, &mut b).unwrap_err(),
            Error::SingularMatrix
        );
    }

    #[test]
    fn test_dependent_rows_are_singular() {
        let mut a = Matrix::from_rows(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]])
            .unwrap();
        let mut b = Matrix::identity(3);
        assert_eq!(
            GaussJordan::solve(&mut a, &mut b).unwrap_err(),
            Error::SingularMatrix
        );
    }

    #[test]
    fn test_shape_checks() {
        let mut a = Matrix::<f64>::zeros(2, 3);
        let mut b = Matrix::zeros(2, 1);
        assert!(GaussJordan::solve(&mut a, &mut b)
            .unwrap_err()
            .is_dimension_mismatch());

        let mut a = Matrix::<f64>::identity(2);
        let mut b = Matrix::zeros(3, 1);
        assert!(GaussJordan::solve(&mut a, &mut b)
            .unwrap_err()
            .is_dimension_mismatch());
    }

    #[test]
    fn test_empty_system() {
        let mut a = Matrix::<f64>::zeros(0, 0);
        let mut b = Matrix::zeros(0, 0);
        GaussJordan::solve(&mut a, &mut b).unwrap();
    }
}
