use nalgebra::DVector;

use crate::{
    error::{Error, Result},
    value::Value,
};

/// An ordered sequence of values with a norm and a dot product.
///
/// Used as the operand and result of [`crate::linalg::Matrix::multiply_vector`].
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Value = f64> {
    data: DVector<T>,
}
impl<T: Value> Vector<T> {
    /// Creates a vector from its values.
    pub fn new(values: Vec<T>) -> Self {
        Self {
            data: DVector::from_vec(values),
        }
    }

    /// Creates a vector of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            data: DVector::from_element(len, value),
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the vector has no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the value at `index`.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.data
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                axis: "element",
                index,
                len: self.len(),
            })
    }

    /// Euclidean norm, `√(Σ vᵢ²)`
    pub fn norm(&self) -> T {
        self.data.norm()
    }

    /// Dot product with another vector.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<T> {
        if self.len() != other.len() {
            return Err(Error::DimensionMismatch {
                context: "vector dot product",
                expected: self.len(),
                found: other.len(),
            });
        }

        Ok(self.data.dot(&other.data))
    }

    /// Iterates over the values.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    /// Borrows the backing nalgebra vector.
    pub fn as_dvector(&self) -> &DVector<T> {
        &self.data
    }
}

impl<T: Value> From<DVector<T>> for Vector<T> {
    fn from(data: DVector<T>) -> Self {
        Self { data }
    }
}

impl<T: Value> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_close;

    #[test]
    fn test_norm() {
        let v = Vector::new(vec![3.0, 4.0]);
        assert_close!(v.norm(), 5.0);
        assert_eq!(Vector::<f64>::filled(0, 1.0).norm(), 0.0);
        assert_close!(Vector::new(vec![1.0, -2.0, 2.0]).norm(), 3.0);
        assert_close!(Vector::<f64>::filled(4, -0.5).norm(), 1.0);
    }

    #[test]
    fn test_dot() {
        let a = Vector::new(vec![1.0, 2.0, 3.0]);
        let b = Vector::from(vec![4.0, -5.0, 6.0]);
        assert_close!(a.dot(&b).unwrap(), 12.0);
        assert_close!(a.dot(&a).unwrap(), a.norm() * a.norm(), 1e-12);
        assert!(a.dot(&Vector::filled(2, 1.0)).unwrap_err().is_dimension_mismatch());
    }

    #[test]
    fn test_get() {
        let v = Vector::new(vec![1.0, 2.0]);
        assert_eq!(v.get(1).unwrap(), 2.0);
        assert!(v.get(2).is_err());
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![1.0, 2.0]);
    }
}
