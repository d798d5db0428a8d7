//! Observed data for fitting
//!
//! A [`DataSeries`] is an ordered sequence of [`DataPoint`]s, each an `(x, y, error)`
//! triple. The error is the standard deviation of the measurement; an error of `0`
//! means "unweighted" and is treated as a standard deviation of `1` whenever weights
//! are computed (see [`DataPoint::std_deviation`]).
//!
//! # Example
//! ```rust
//! use lsqfit::data::DataSeries;
//!
//! // Unweighted points
//! let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
//! assert_eq!(data.len(), 3);
//!
//! // Points with per-point uncertainty
//! let data = DataSeries::from(vec![(0.0, 1.0, 0.1), (1.0, 3.0, 0.2)]);
//! assert_eq!(data[1].error(), 0.2);
//! ```
use std::ops::{Index, RangeInclusive};

use crate::{
    error::{Error, Result},
    function::ParametricFunction,
    value::{SteppedValues, Value},
};

/// A single observation: `x`, the measured `y`, and the standard deviation of `y`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataPoint<T: Value = f64> {
    x: T,
    y: T,
    error: T,
}
impl<T: Value> DataPoint<T> {
    /// Creates a point with an explicit measurement error.
    pub fn new(x: T, y: T, error: T) -> Self {
        Self { x, y, error }
    }

    /// Creates an unweighted point (error `0`).
    pub fn unweighted(x: T, y: T) -> Self {
        Self::new(x, y, T::zero())
    }

    /// The independent variable
    pub fn x(&self) -> T {
        self.x
    }

    /// The measured value
    pub fn y(&self) -> T {
        self.y
    }

    /// The recorded measurement error, as given
    pub fn error(&self) -> T {
        self.error
    }

    /// The standard deviation used for weighting.
    ///
    /// A recorded error of zero is replaced by `1`, so unweighted points contribute
    /// with unit weight instead of dividing by zero.
    pub fn std_deviation(&self) -> T {
        if self.error == T::zero() {
            T::one()
        } else {
            self.error
        }
    }

    /// Inverse-variance weight, `1 / σ²`
    pub fn weight(&self) -> T {
        let sigma = self.std_deviation();
        T::one() / (sigma * sigma)
    }
}

impl<T: Value> From<(T, T)> for DataPoint<T> {
    fn from((x, y): (T, T)) -> Self {
        Self::unweighted(x, y)
    }
}

impl<T: Value> From<(T, T, T)> for DataPoint<T> {
    fn from((x, y, error): (T, T, T)) -> Self {
        Self::new(x, y, error)
    }
}

/// An ordered series of observations.
///
/// Insertion order is preserved; fitting engines walk the points in this order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataSeries<T: Value = f64> {
    points: Vec<DataPoint<T>>,
}
impl<T: Value> DataSeries<T> {
    /// Creates a series from existing points.
    pub fn new(points: Vec<DataPoint<T>>) -> Self {
        Self { points }
    }

    /// Creates a series from raw rows of `[x, y]` or `[x, y, error]`.
    ///
    /// Rows with two values are unweighted.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDataPoint`] for a row with fewer than 2 or more than 3 values.
    ///
    /// # Example
    /// ```rust
    /// # use lsqfit::data::DataSeries;
    /// let rows: &[&[f64]] = &[&[0.0, 1.0], &[1.0, 2.0, 0.5]];
    /// let data = DataSeries::from_rows(rows).unwrap();
    /// assert_eq!(data[0].error(), 0.0);
    /// assert_eq!(data[1].error(), 0.5);
    /// ```
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        rows.iter()
            .enumerate()
            .map(|(index, row)| match *row.as_ref() {
                [x, y] => Ok(DataPoint::unweighted(x, y)),
                [x, y, error] => Ok(DataPoint::new(x, y, error)),
                ref other => Err(Error::InvalidDataPoint {
                    index,
                    len: other.len(),
                }),
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Samples a function at the given x-values, producing unweighted points.
    ///
    /// # Errors
    /// Returns an error if the function cannot be evaluated (for example, its
    /// parameters were never set).
    pub fn from_function<F: ParametricFunction<T>>(
        function: &F,
        xs: impl IntoIterator<Item = T>,
    ) -> Result<Self> {
        xs.into_iter()
            .map(|x| Ok(DataPoint::unweighted(x, function.y(x)?)))
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Samples a function at `n` evenly spaced points covering `range`, ends included.
    ///
    /// # Errors
    /// Returns an error if the function cannot be evaluated.
    ///
    /// # Example
    /// ```rust
    /// # use lsqfit::{data::DataSeries, function::{ParametricFunction, LinearFunction}};
    /// let mut line = LinearFunction::new();
    /// line.set_parameters(&[1.0, 2.0]).unwrap();
    ///
    /// let data = DataSeries::sample_interval(&line, 0.0..=2.0, 3).unwrap();
    /// assert_eq!(data.y_values(), vec![1.0, 3.0, 5.0]);
    /// ```
    pub fn sample_interval<F: ParametricFunction<T>>(
        function: &F,
        range: RangeInclusive<T>,
        n: usize,
    ) -> Result<Self> {
        Self::from_function(function, SteppedValues::evenly_spaced(range, n))
    }

    /// Samples a function over `range` with a fixed step, ends included.
    ///
    /// # Errors
    /// Returns an error if the function cannot be evaluated.
    pub fn sample_range<F: ParametricFunction<T>>(
        function: &F,
        range: RangeInclusive<T>,
        step: T,
    ) -> Result<Self> {
        Self::from_function(function, SteppedValues::new(range, step))
    }

    /// Appends a point to the end of the series.
    pub fn push(&mut self, point: impl Into<DataPoint<T>>) {
        self.points.push(point.into());
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the series holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the point at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&DataPoint<T>> {
        self.points.get(index)
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, DataPoint<T>> {
        self.points.iter()
    }

    /// The points as a slice
    pub fn points(&self) -> &[DataPoint<T>] {
        &self.points
    }

    /// All x-values, in order
    pub fn x_values(&self) -> Vec<T> {
        self.points.iter().map(DataPoint::x).collect()
    }

    /// All y-values, in order
    pub fn y_values(&self) -> Vec<T> {
        self.points.iter().map(DataPoint::y).collect()
    }
}

impl<T: Value> Index<usize> for DataSeries<T> {
    type Output = DataPoint<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a, T: Value> IntoIterator for &'a DataSeries<T> {
    type Item = &'a DataPoint<T>;
    type IntoIter = std::slice::Iter<'a, DataPoint<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T: Value, P: Into<DataPoint<T>>> FromIterator<P> for DataSeries<T> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Value, P: Into<DataPoint<T>>> From<Vec<P>> for DataSeries<T> {
    fn from(points: Vec<P>) -> Self {
        points.into_iter().collect()
    }
}

impl<T: Value, P: Into<DataPoint<T>> + Copy> From<&[P]> for DataSeries<T> {
    fn from(points: &[P]) -> Self {
        points.iter().copied().collect()
    }
}
