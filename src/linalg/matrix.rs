use nalgebra::DMatrix;

use crate::{
    error::{Error, Result},
    linalg::{GaussJordan, Vector},
    value::Value,
};

/// The largest absolute value found by [`Matrix::find_biggest_value`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot<T: Value> {
    /// Absolute value of the entry
    pub value: T,

    /// Row of the entry
    pub row: usize,

    /// Column of the entry
    pub column: usize,
}

/// A dense, row-addressed matrix of floating-point values.
///
/// Every read and write is bounds-checked and reports
/// [`Error::IndexOutOfBounds`] instead of panicking. Row operations mutate in place
/// and return `&mut Self` so they can be chained:
///
/// ```rust
/// # use lsqfit::linalg::Matrix;
/// let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// m.interchange_rows(0, 1)
///     .unwrap()
///     .multiply_row_by(0, 0.5)
///     .unwrap();
/// assert_eq!(m.get(0, 0).unwrap(), 1.5);
/// ```
///
/// Equality (`==`) is exact, element by element. Results of elimination rarely
/// compare equal bit-for-bit; prefer [`Matrix::approx_eq`] for those.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Value = f64> {
    data: DMatrix<T>,
}
impl<T: Value> Matrix<T> {
    /// Creates a `rows × columns` matrix with every cell set to `value`.
    pub fn filled(rows: usize, columns: usize, value: T) -> Self {
        Self {
            data: DMatrix::from_element(rows, columns, value),
        }
    }

    /// Creates a `rows × columns` matrix of zeros.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Self::filled(rows, columns, T::zero())
    }

    /// Creates the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        Self {
            data: DMatrix::identity(n, n),
        }
    }

    /// Creates a matrix from a list of rows.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if the rows are not all the same length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |row| row.as_ref().len());
        if let Some(bad) = rows.iter().find(|row| row.as_ref().len() != columns) {
            return Err(Error::DimensionMismatch {
                context: "matrix row length",
                expected: columns,
                found: bad.as_ref().len(),
            });
        }

        Ok(Self {
            data: DMatrix::from_fn(rows.len(), columns, |i, j| rows[i].as_ref()[j]),
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn columns(&self) -> usize {
        self.data.ncols()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    /// True if the matrix has as many rows as columns
    pub fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                axis: "row",
                index: row,
                len: self.rows(),
            })
        }
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column < self.columns() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                axis: "column",
                index: column,
                len: self.columns(),
            })
        }
    }

    /// Returns the value at `(row, column)`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if either index is outside the matrix.
    pub fn get(&self, row: usize, column: usize) -> Result<T> {
        self.check_row(row)?;
        self.check_column(column)?;
        Ok(self.data[(row, column)])
    }

    /// Sets the value at `(row, column)`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if either index is outside the matrix.
    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        self.check_row(row)?;
        self.check_column(column)?;
        self.data[(row, column)] = value;
        Ok(())
    }

    /// Returns the main diagonal.
    pub fn diagonal(&self) -> Vec<T> {
        self.data.diagonal().iter().copied().collect()
    }

    /// Returns a copy of the matrix as a list of rows.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Swaps two rows in place.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if either row does not exist.
    pub fn interchange_rows(&mut self, first: usize, second: usize) -> Result<&mut Self> {
        self.check_row(first)?;
        self.check_row(second)?;
        if first != second {
            self.data.swap_rows(first, second);
        }
        Ok(self)
    }

    /// Swaps two columns in place.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if either column does not exist.
    pub fn interchange_columns(&mut self, first: usize, second: usize) -> Result<&mut Self> {
        self.check_column(first)?;
        self.check_column(second)?;
        if first != second {
            self.data.swap_columns(first, second);
        }
        Ok(self)
    }

    /// Multiplies every value in `row` by `scalar`.
    ///
    /// # Errors
    /// - [`Error::DivisionByZero`] if `scalar` is zero; the operation would destroy the row.
    /// - [`Error::IndexOutOfBounds`] if the row does not exist.
    pub fn multiply_row_by(&mut self, row: usize, scalar: T) -> Result<&mut Self> {
        if scalar == T::zero() {
            return Err(Error::DivisionByZero);
        }
        self.check_row(row)?;

        for value in self.data.row_mut(row).iter_mut() {
            *value *= scalar;
        }
        Ok(self)
    }

    /// Adds `multiple` times row `source` onto row `target`.
    ///
    /// `target[*] += multiple * source[*]`
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if either row does not exist.
    pub fn add_multiple_of_row(
        &mut self,
        multiple: T,
        source: usize,
        target: usize,
    ) -> Result<&mut Self> {
        self.check_row(source)?;
        self.check_row(target)?;

        for column in 0..self.columns() {
            let addend = self.data[(source, column)] * multiple;
            self.data[(target, column)] += addend;
        }
        Ok(self)
    }

    /// Finds the entry with the largest absolute value, optionally skipping a row and/or column.
    ///
    /// Ties keep the first entry found in row-major order. An all-zero (or empty)
    /// search area reports a value of zero at `(0, 0)`.
    pub fn find_biggest_value(
        &self,
        exclude_row: Option<usize>,
        exclude_column: Option<usize>,
    ) -> Pivot<T> {
        let mut pivot = Pivot {
            value: T::zero(),
            row: 0,
            column: 0,
        };

        for row in (0..self.rows()).filter(|&r| Some(r) != exclude_row) {
            for column in (0..self.columns()).filter(|&c| Some(c) != exclude_column) {
                let value = Value::abs(self.data[(row, column)]);
                if value > pivot.value {
                    pivot = Pivot { value, row, column };
                }
            }
        }

        pivot
    }

    /// Grows the matrix to `new_columns × new_rows`, filling new cells with `value`.
    ///
    /// Existing data stays at the origin, or with `prepend` set, is shifted so that
    /// the new rows and columns come before it.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if either new size is smaller than the current one.
    pub fn expand_to_size(
        &mut self,
        new_columns: usize,
        new_rows: usize,
        value: T,
        prepend: bool,
    ) -> Result<&mut Self> {
        let (rows, columns) = self.shape();
        if new_columns < columns {
            return Err(Error::DimensionMismatch {
                context: "expanded column count (cannot shrink)",
                expected: columns,
                found: new_columns,
            });
        }
        if new_rows < rows {
            return Err(Error::DimensionMismatch {
                context: "expanded row count (cannot shrink)",
                expected: rows,
                found: new_rows,
            });
        }

        let (row_offset, column_offset) = if prepend {
            (new_rows - rows, new_columns - columns)
        } else {
            (0, 0)
        };

        let mut expanded = DMatrix::from_element(new_rows, new_columns, value);
        expanded
            .view_mut((row_offset, column_offset), (rows, columns))
            .copy_from(&self.data);
        self.data = expanded;

        Ok(self)
    }

    /// Computes the inverse of a square matrix.
    ///
    /// The inverse is produced by solving `A·X = I` with [`GaussJordan`] on a copy of
    /// this matrix, which is left untouched.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if the matrix is not square.
    /// - [`Error::SingularMatrix`] if it has no inverse.
    pub fn inverse(&self) -> Result<Self> {
        if !self.is_square() {
            return Err(Error::DimensionMismatch {
                context: "inverse of a non-square matrix",
                expected: self.rows(),
                found: self.columns(),
            });
        }

        let mut a = self.clone();
        let mut b = Self::identity(self.rows());
        GaussJordan::solve(&mut a, &mut b)?;
        Ok(b)
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.transpose(),
        }
    }

    /// Computes the matrix product `self · other`.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if `self.columns() != other.rows()`.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.columns() != other.rows() {
            return Err(Error::DimensionMismatch {
                context: "matrix product inner dimension",
                expected: self.columns(),
                found: other.rows(),
            });
        }

        Ok(Self {
            data: &self.data * &other.data,
        })
    }

    /// Computes the matrix-vector product `self · vector`.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if the vector length differs from the column count.
    pub fn multiply_vector(&self, vector: &Vector<T>) -> Result<Vector<T>> {
        if self.columns() != vector.len() {
            return Err(Error::DimensionMismatch {
                context: "matrix-vector product",
                expected: self.columns(),
                found: vector.len(),
            });
        }

        Ok(Vector::from(&self.data * vector.as_dvector()))
    }

    /// Compares two matrices element-wise within an absolute tolerance.
    ///
    /// Matrices of different shape are never equal.
    pub fn approx_eq(&self, other: &Self, tolerance: T) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(&a, &b)| Value::abs(a - b) <= tolerance)
    }

    /// Borrows the backing nalgebra matrix.
    pub fn as_dmatrix(&self) -> &DMatrix<T> {
        &self.data
    }

    /// Unwraps the backing nalgebra matrix.
    pub fn into_dmatrix(self) -> DMatrix<T> {
        self.data
    }
}

impl<T: Value> From<DMatrix<T>> for Matrix<T> {
    fn from(data: DMatrix<T>) -> Self {
        Self { data }
    }
}

impl<T: Value> std::fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.data.row_iter() {
            for value in row.iter() {
                write!(f, "{value:6.4}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    fn sample() -> Matrix {
        Matrix::from_rows(&[[1.0, -7.0, 3.0], [4.0, 5.0, -6.0]]).unwrap()
    }

    #[test]
    fn test_set_then_get() {
        let mut m = Matrix::zeros(3, 4);
        for row in 0..3 {
            for column in 0..4 {
                let v = (row * 10 + column) as f64;
                m.set(row, column, v).unwrap();
                assert_eq!(m.get(row, column).unwrap(), v);
            }
        }
    }

    #[test]
    fn test_out_of_bounds() {
        let mut m = sample();
        assert_eq!(
            m.get(2, 0),
            Err(Error::IndexOutOfBounds {
                axis: "row",
                index: 2,
                len: 2
            })
        );
        assert!(matches!(
            m.set(0, 3, 1.0),
            Err(Error::IndexOutOfBounds { axis: "column", .. })
        ));
        assert!(m.interchange_rows(0, 5).is_err());
        assert!(m.add_multiple_of_row(1.0, 9, 0).is_err());
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Matrix::from_rows(&rows).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_factories() {
        let m = Matrix::filled(2, 3, 1.5);
        assert_eq!(m.shape(), (2, 3));
        assert!(m.to_rows().iter().flatten().all(|&v| v == 1.5));

        let i = Matrix::<f64>::identity(3);
        assert_eq!(i.diagonal(), vec![1.0, 1.0, 1.0]);
        assert_eq!(i.get(0, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_row_operations() {
        let mut m = sample();
        m.interchange_rows(0, 1).unwrap();
        assert_eq!(m.to_rows(), vec![vec![4.0, 5.0, -6.0], vec![1.0, -7.0, 3.0]]);

        m.multiply_row_by(1, 2.0).unwrap();
        assert_eq!(m.to_rows()[1], vec![2.0, -14.0, 6.0]);

        m.add_multiple_of_row(-2.0, 1, 0).unwrap();
        assert_eq!(m.to_rows()[0], vec![0.0, 33.0, -18.0]);

        m.interchange_columns(0, 2).unwrap();
        assert_eq!(m.to_rows()[0], vec![-18.0, 33.0, 0.0]);
    }

    #[test]
    fn test_multiply_row_by_zero() {
        let mut m = sample();
        assert_eq!(m.multiply_row_by(0, 0.0).unwrap_err(), Error::DivisionByZero);
    }

    #[test]
    fn test_find_biggest_value() {
        let m = sample();
        let p = m.find_biggest_value(None, None);
        assert_eq!((p.value, p.row, p.column), (7.0, 0, 1));

        let p = m.find_biggest_value(None, Some(1));
        assert_eq!((p.value, p.row, p.column), (6.0, 1, 2));

        let p = m.find_biggest_value(Some(0), Some(2));
        assert_eq!((p.value, p.row, p.column), (5.0, 1, 1));
    }

    #[test]
    fn test_expand_to_size() {
        let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        m.expand_to_size(3, 4, 9.0, false).unwrap();
        assert_eq!(
            m.to_rows(),
            vec![
                vec![1.0, 2.0, 9.0],
                vec![3.0, 4.0, 9.0],
                vec![9.0, 9.0, 9.0],
                vec![9.0, 9.0, 9.0],
            ]
        );

        let mut m = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        m.expand_to_size(3, 3, 0.0, true).unwrap();
        assert_eq!(
            m.to_rows(),
            vec![
                vec![0.0, 0.0, 0.0],
                vec![0.0, 1.0, 2.0],
                vec![0.0, 3.0, 4.0],
            ]
        );

        assert!(m.expand_to_size(2, 3, 0.0, false).is_err());
        assert!(m.expand_to_size(3, 2, 0.0, false).is_err());
    }

    #[test]
    fn test_identity_inverse_is_identity() {
        for n in 1..6 {
            let i = Matrix::<f64>::identity(n);
            assert_eq!(i.inverse().unwrap(), i);
        }
    }

    #[test]
    fn test_inverse() {
        let m = Matrix::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
        let inv = m.inverse().unwrap();
        let expected = Matrix::from_rows(&[[0.6, -0.7], [-0.2, 0.4]]).unwrap();
        assert!(inv.approx_eq(&expected, 1e-12));

        let product = m.multiply(&inv).unwrap();
        assert!(product.approx_eq(&Matrix::identity(2), 1e-12));
    }

    #[test]
    fn test_inverse_non_square() {
        assert!(sample().inverse().unwrap_err().is_dimension_mismatch());
    }

    #[test]
    fn test_products() {
        let m = sample();
        let v = Vector::new(vec![1.0, 1.0, 1.0]);
        let mv = m.multiply_vector(&v).unwrap();
        assert_close!(mv.get(0).unwrap(), -3.0);
        assert_close!(mv.get(1).unwrap(), 3.0);

        assert!(m.multiply_vector(&Vector::new(vec![1.0])).is_err());
        assert!(m.multiply(&m).is_err());

        let mmt = m.multiply(&m.transpose()).unwrap();
        assert_eq!(mmt.shape(), (2, 2));
        assert_close!(mmt.get(0, 1).unwrap(), 4.0 - 35.0 - 18.0);
    }

    #[test]
    fn test_equality() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a, b);
        b.set(1, 1, 5.0 + 1e-12).unwrap();
        assert_ne!(a, b);
        assert!(a.approx_eq(&b, 1e-9));
        assert!(!a.approx_eq(&Matrix::zeros(3, 2), 1e9));
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(&[[1.0, 0.5]]).unwrap();
        assert_eq!(m.to_string(), "1.0000\t0.5000\t\n");
    }
}
