//! Numeric types and iteration utilities.
//!
//! This module defines the [`Value`] trait, which abstracts the floating-point
//! types the fitting engines can work with, ensuring compatibility with nalgebra
//! and with the formatting used when rendering functions.
//!
//! # Traits
//!
//! - [`Value`]: Extends `RealField`, `Scalar` and `FloatCore` to provide:
//!   - A canonical `two()` constant, and `constant` for arbitrary `f64` literals.
//!   - `try_cast` for safe type conversion with error handling.
//!   - Unambiguous `powi` and `abs`.
//!
//! # Iterators
//!
//! - [`SteppedValues`]: A floating-point range iterator with a specified step,
//!   useful for generating sample abscissae.
//!
//! # Example
//!
//! ```rust
//! use lsqfit::value::{Value, SteppedValues};
//!
//! // 0.0, 0.25, ..., 1.0
//! let xs: Vec<f64> = SteppedValues::new(0.0..=1.0, 0.25).collect();
//! assert_eq!(xs.len(), 5);
//!
//! let damping = f64::constant(1e-3);
//! let squared = f64::two().powi(2);
//! ```
use std::ops::RangeInclusive;

use crate::error::Error;

/// Numeric type for data, parameters and matrices
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
    + Send
    + Sync
{
    /// Returns the value 2.0
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Converts an `f64` constant into this type.
    ///
    /// Used for tuning constants such as damping factors and tolerances.
    #[must_use]
    fn constant(value: f64) -> Self {
        nalgebra::convert(value)
    }

    /// Tries to cast a value to the target type
    ///
    /// # Errors
    /// Returns an error if the cast fails
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Converts the value to `usize`
    fn as_usize(&self) -> Option<usize> {
        num_traits::cast(*self)
    }

    /// Raises the value to the power of an integer
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Raises the value to the power of a non-negative index
    ///
    /// Saturates at `i32::MAX` for absurdly large exponents.
    #[must_use]
    fn powu(self, n: usize) -> Self {
        Value::powi(self, i32::try_from(n).unwrap_or(i32::MAX))
    }

    /// Get the absolute value for a numeric type
    #[must_use]
    fn abs(self) -> Self {
        nalgebra::ComplexField::abs(self)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
        + Send
        + Sync
{
}

/// Iterator over a range of floating-point values with a specified step.
///
/// This iterator yields values starting from `start` up to and including `end`,
/// incrementing by `step` on each iteration.
///
/// Values are computed as `start + i * step`, so there is no accumulated drift.
#[derive(Debug, Clone)]
pub struct SteppedValues<T: Value> {
    range: RangeInclusive<T>,
    step: T,
    index: T,
}
impl<T: Value> SteppedValues<T> {
    /// Creates a new iterator over stepped values in a range
    pub fn new(range: RangeInclusive<T>, step: T) -> Self {
        Self {
            range,
            step,
            index: T::zero(),
        }
    }

    /// Creates an iterator over `n` evenly spaced values covering `range`.
    ///
    /// Both ends are included. For `n < 2` only the start of the range is produced.
    pub fn evenly_spaced(range: RangeInclusive<T>, n: usize) -> impl Iterator<Item = T> {
        let start = *range.start();
        let delta = if n > 1 {
            (*range.end() - start) / T::from_positive_int(n - 1)
        } else {
            T::zero()
        };
        (0..n.max(1)).map(move |i| start + T::from_positive_int(i) * delta)
    }
}
impl<T: Value> Iterator for SteppedValues<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step <= T::zero() {
            return None;
        }

        let value = *self.range.start() + self.index * self.step;
        if value <= *self.range.end() {
            self.index += T::one();
            Some(value)
        } else {
            None
        }
    }
}
