//! Parametric functions that can be fitted to data
//!
//! A fittable function is a scalar function of one variable, `y = f(x; p)`, described by
//! a parameter vector `p` whose length is the function's *degrees of freedom*.
//!
//! Every function implements [`ParametricFunction`]. On top of that, a function exposes
//! one or both of the capabilities the fitting engines need:
//! - [`LinearCombination`]: `f` is a weighted sum of basis functions, `f(x) = Σ pᵢ·φᵢ(x)`.
//!   Required by [`crate::fitting::LinearFit`].
//! - [`NonLinearCombination`]: `f` exposes `∂f/∂pᵢ` at its current parameters.
//!   Required by [`crate::fitting::LevenbergMarquardt`].
//!
//! # Provided functions
//! - [`Polynomial`]: `a₀ + a₁x + ... + aₙxⁿ`. Implements both capabilities.
//! - [`LinearFunction`]: a polynomial of order 1.
//! - [`GaussianFunction`]: `offset + height·exp(-((x - center) / width)²)`.
//! - [`CustomFunction`]: a non-linear model built from closures.
//! - [`CustomBasis`]: a linear combination of caller-supplied basis functions.
//!
//! # Rolling Your Own
//! Store the parameters in a [`ParameterVector`], which enforces the length and
//! "set before use" rules, and implement the capability your model supports.
use crate::{
    error::{Error, Result},
    value::Value,
};

mod custom;
pub use custom::{CustomBasis, CustomFunction};

mod gaussian;
pub use gaussian::GaussianFunction;

mod polynomial;
pub use polynomial::{LinearFunction, Polynomial};

/// A scalar function of one variable with an ordered parameter vector.
///
/// Parameters are only ever replaced as a whole through [`ParametricFunction::set_parameters`].
pub trait ParametricFunction<T: Value = f64>: std::fmt::Display {
    /// Human-readable name of the function
    fn name(&self) -> String;

    /// Number of independent parameters describing the function
    fn degrees_of_freedom(&self) -> usize;

    /// Replaces the parameter vector.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if `parameters.len()` differs from
    /// [`ParametricFunction::degrees_of_freedom`].
    fn set_parameters(&mut self, parameters: &[T]) -> Result<()>;

    /// The current parameter vector.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] if the parameters were never set.
    fn parameters(&self) -> Result<&[T]>;

    /// Evaluates the function at `x` using the current parameters.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] if the parameters were never set.
    fn y(&self, x: T) -> Result<T>;
}

/// A function that is a linear combination of basis functions.
pub trait LinearCombination<T: Value = f64>: ParametricFunction<T> {
    /// Evaluates the `index`-th basis function at `x`.
    ///
    /// The value does not depend on the current parameters.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= degrees_of_freedom()`.
    fn basis_function(&self, x: T, index: usize) -> Result<T>;
}

/// A function that can report its partial derivatives with respect to its parameters.
pub trait NonLinearCombination<T: Value = f64>: ParametricFunction<T> {
    /// `∂f/∂pᵢ` evaluated at `x` for the current parameters, where `i = index`.
    ///
    /// # Errors
    /// - [`Error::IndexOutOfBounds`] if `index >= degrees_of_freedom()`.
    /// - [`Error::NotInitialized`] if the parameters were never set.
    fn partial_derivative(&self, x: T, index: usize) -> Result<T>;
}

/// Fixed-length parameter storage that starts out unset.
///
/// # Example
/// ```rust
/// # use lsqfit::function::ParameterVector;
/// let mut params = ParameterVector::<f64>::new(2);
/// assert!(params.get("line").is_err());
///
/// params.set(&[1.0, 2.0]).unwrap();
/// assert_eq!(params.get("line").unwrap(), &[1.0, 2.0]);
/// assert!(params.set(&[1.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterVector<T: Value = f64> {
    len: usize,
    values: Option<Vec<T>>,
}
impl<T: Value> ParameterVector<T> {
    /// Creates unset storage for `len` parameters.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, values: None }
    }

    /// Number of parameters this storage holds
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the storage holds no parameters at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True once [`ParameterVector::set`] has succeeded
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.values.is_some()
    }

    /// Replaces every value at once.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if `values.len() != self.len()`.
    pub fn set(&mut self, values: &[T]) -> Result<()> {
        if values.len() != self.len {
            return Err(Error::DimensionMismatch {
                context: "parameter vector",
                expected: self.len,
                found: values.len(),
            });
        }

        self.values = Some(values.to_vec());
        Ok(())
    }

    /// The values, or [`Error::NotInitialized`] naming `owner` if never set.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] if the values were never set.
    pub fn get(&self, owner: &'static str) -> Result<&[T]> {
        self.values
            .as_deref()
            .ok_or(Error::NotInitialized(owner))
    }

    /// Validates a parameter index.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= self.len()`.
    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                axis: "parameter",
                index,
                len: self.len,
            })
        }
    }
}
