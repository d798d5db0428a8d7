//! Descriptive statistics for data series
//!
//! These are summaries of the raw data, independent of any fitted function.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`variance`]: Sample variance, dividing by `N - 1`.
//! - [`std_dev`]: Sample standard deviation.
//! - [`moment_about_mean`]: k-th central moment, dividing by `N - 1`.
//! - [`standardized_moment`]: k-th central moment in units of the standard deviation.
//! - [`skewness`]: Adjusted Fisher-Pearson skewness; asymmetry of the distribution.
//! - [`kurtosis`]: Adjusted excess kurtosis; "tailedness" of the distribution.
//!
//! # Regression
//! - [`slope_intercept`]: Ordinary least-squares line through `(x, y)` pairs.
//!
//! # Summary
//! - [`Summary`]: All of the above for the y-values of a [`DataSeries`], with the
//!   regression line taken over its points.
//!
//! # Examples
//!
//! ```rust
//! use lsqfit::{data::DataSeries, statistics::Summary};
//!
//! let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 2.9), (2.0, 5.2), (3.0, 6.8), (4.0, 9.1)]);
//! let summary = Summary::new(&data).unwrap();
//!
//! assert_eq!(summary.length, 5);
//! println!("y = {:?}x + {:?}", summary.slope, summary.intercept);
//! ```
use crate::{
    data::DataSeries,
    error::{Error, Result},
    value::Value,
};

/// Calculates the arithmetic mean of a sequence of values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// Mean = (Σ x_i) / N
/// where
///   x_i = each value in the dataset, N = total number of values
/// ```
/// </div>
///
/// # Returns
/// The arithmetic mean of all elements in `data`.
/// - Returns zero if the iterator yields no elements.
///
/// # Examples
/// ```rust
/// let values = vec![1.0, 2.0, 3.0];
/// let m = lsqfit::statistics::mean(values.into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let mut sum = T::zero();
    let mut count = 0;
    for value in data {
        sum += value;
        count += 1;
    }

    if count == 0 {
        return T::zero();
    }
    sum / T::from_positive_int(count)
}

/// Calculates the sample variance of a dataset.
/// - Uses the sample formula (divides by `N-1`) rather than `N`.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// s² = (Σ (x_i - Mean)²) / (N - 1)
/// ```
/// </div>
///
/// # Returns
/// `None` for fewer than 2 values.
///
/// # Examples
/// ```rust
/// let v = lsqfit::statistics::variance(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(v, 2.5);
/// ```
pub fn variance<T: Value>(data: &[T]) -> Option<T> {
    if data.len() < 2 {
        return None;
    }

    let mean = mean(data.iter().copied());
    let sum_sq_diff = data
        .iter()
        .fold(T::zero(), |acc, &x| acc + Value::powi(x - mean, 2));
    Some(sum_sq_diff / T::from_positive_int(data.len() - 1))
}

/// Square root of [`variance`].
///
/// # Returns
/// `None` for fewer than 2 values.
pub fn std_dev<T: Value>(data: &[T]) -> Option<T> {
    variance(data).map(nalgebra::ComplexField::sqrt)
}

/// Calculates the k-th moment about the mean, on the same `N - 1` footing as [`variance`].
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// μ_k = (Σ (x_i - Mean)^k) / (N - 1)
/// ```
/// </div>
///
/// # Returns
/// `None` for fewer than 2 values.
///
/// # Examples
/// ```rust
/// # use lsqfit::statistics::{moment_about_mean, variance};
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(moment_about_mean(&data, 2), variance(&data));
/// ```
pub fn moment_about_mean<T: Value>(data: &[T], k: usize) -> Option<T> {
    if data.len() < 2 {
        return None;
    }

    let mean = mean(data.iter().copied());
    let sum = data
        .iter()
        .fold(T::zero(), |acc, &x| acc + Value::powu(x - mean, k));
    Some(sum / T::from_positive_int(data.len() - 1))
}

/// Calculates the k-th standardized moment, [`moment_about_mean`] divided by `s^k`.
///
/// # Returns
/// `None` for fewer than 2 values, or if every value is identical.
pub fn standardized_moment<T: Value>(data: &[T], k: usize) -> Option<T> {
    let sigma = std_dev(data)?;
    if sigma == T::zero() {
        return None;
    }

    moment_about_mean(data, k).map(|moment| moment / Value::powu(sigma, k))
}

/// Population central moments `(m2, m3, m4)`, each divided by `N`.
fn central_moments<T: Value>(data: &[T]) -> (T, T, T) {
    let mean = mean(data.iter().copied());
    let (mut m2, mut m3, mut m4) = (T::zero(), T::zero(), T::zero());
    for &x in data {
        let diff = x - mean;
        m2 += Value::powi(diff, 2);
        m3 += Value::powi(diff, 3);
        m4 += Value::powi(diff, 4);
    }

    let n = T::from_positive_int(data.len());
    (m2 / n, m3 / n, m4 / n)
}

/// Computes the adjusted skewness of a dataset.
///
/// Skewness measures the asymmetry of the distribution:
/// - Positive skew → tail to the right
/// - Negative skew → tail to the left
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// g1 = m3 / m2^(3/2)
/// G1 = g1 · √(N (N - 1)) / (N - 2)
/// where
///   m_k = (Σ (x_i - Mean)^k) / N
/// ```
/// </div>
///
/// # Returns
/// `None` for fewer than 3 values, or if every value is identical.
///
/// # Examples
/// ```rust
/// let skew = lsqfit::statistics::skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(skew, 0.0);
/// ```
pub fn skewness<T: Value>(data: &[T]) -> Option<T> {
    let n = data.len();
    if n < 3 {
        return None;
    }

    let (m2, m3, _) = central_moments(data);
    if m2 <= T::zero() {
        return None;
    }

    let g1 = m3 / Value::powi(m2.sqrt(), 3);
    let nf = T::from_positive_int(n);
    Some(g1 * (nf * (nf - T::one())).sqrt() / (nf - T::two()))
}

/// Computes the adjusted excess kurtosis of a dataset.
///
/// Kurtosis measures the "tailedness" of the distribution:
/// - Excess kurtosis is relative to a normal distribution, which scores 0
/// - Positive excess kurtosis → heavier tails than normal
/// - Negative excess kurtosis → lighter tails than normal
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// g2 = m4 / m2² - 3
/// G2 = ((N + 1) g2 + 6) · (N - 1) / ((N - 2)(N - 3))
/// where
///   m_k = (Σ (x_i - Mean)^k) / N
/// ```
/// </div>
///
/// # Returns
/// `None` for fewer than 4 values, or if every value is identical.
///
/// # Examples
/// ```rust
/// let kurt = lsqfit::statistics::kurtosis(&[1.0_f64, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert!((kurt + 1.2).abs() < 1e-12);
/// ```
pub fn kurtosis<T: Value>(data: &[T]) -> Option<T> {
    let n = data.len();
    if n < 4 {
        return None;
    }

    let (m2, _, m4) = central_moments(data);
    if m2 <= T::zero() {
        return None;
    }

    let three = T::two() + T::one();
    let g2 = m4 / Value::powi(m2, 2) - three;

    let nf = T::from_positive_int(n);
    let six = three * T::two();
    let scale = (nf - T::one()) / ((nf - T::two()) * (nf - three));
    Some(((nf + T::one()) * g2 + six) * scale)
}

/// Fits `y = slope·x + intercept` by ordinary (unweighted) least squares.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// slope     = (N Σxy - Σx Σy) / (N Σx² - (Σx)²)
/// intercept = (Σy - slope Σx) / N
/// ```
/// </div>
///
/// # Returns
/// `(slope, intercept)`, or `None` if the slices differ in length, are empty, or every
/// x-value is the same.
///
/// # Examples
/// ```rust
/// let (slope, intercept) = lsqfit::statistics::slope_intercept(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
/// assert_eq!((slope, intercept), (2.0, 1.0));
/// ```
pub fn slope_intercept<T: Value>(x: &[T], y: &[T]) -> Option<(T, T)> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }

    let (mut sx, mut sy, mut sxy, mut sxx) = (T::zero(), T::zero(), T::zero(), T::zero());
    for (&x, &y) in x.iter().zip(y) {
        sx += x;
        sy += y;
        sxy += x * y;
        sxx += x * x;
    }

    let n = T::from_positive_int(x.len());
    let denominator = n * sxx - sx * sx;
    if denominator == T::zero() {
        return None;
    }

    let slope = (n * sxy - sx * sy) / denominator;
    Some((slope, (sy - slope * sx) / n))
}

/// Descriptive statistics of a data series.
///
/// Moments describe the y-values; the regression line is fitted through the points,
/// ignoring their errors.
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, statistics::Summary};
/// let data = DataSeries::from(vec![(0.0_f64, 1.0), (1.0, 2.0), (2.0, 10.0)]);
/// let summary = Summary::new(&data).unwrap();
///
/// assert!((summary.variance.unwrap() - 73.0 / 3.0).abs() < 1e-12);
/// assert!(summary.skewness.unwrap() > 0.0);
/// assert_eq!(summary.kurtosis, None); // Needs 4 points
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Summary<T: Value = f64> {
    /// Number of points
    pub length: usize,

    /// Mean of the y-values
    pub mean: T,

    /// Sample variance of the y-values, see [`variance`]
    pub variance: Option<T>,

    /// Sample standard deviation of the y-values
    pub standard_deviation: Option<T>,

    /// Slope of the least-squares line, see [`slope_intercept`]
    pub slope: Option<T>,

    /// Intercept of the least-squares line
    pub intercept: Option<T>,

    /// Adjusted skewness of the y-values, see [`skewness`]
    pub skewness: Option<T>,

    /// Adjusted excess kurtosis of the y-values, see [`kurtosis`]
    pub kurtosis: Option<T>,
}
impl<T: Value> Summary<T> {
    /// Summarizes `data`.
    ///
    /// # Errors
    /// - [`Error::NoData`] if the series is empty.
    /// - [`Error::DuplicateX`] if two points share an x-value.
    pub fn new(data: &DataSeries<T>) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::NoData);
        }

        let x = data.x_values();
        for (index, value) in x.iter().enumerate() {
            if x[..index].contains(value) {
                return Err(Error::DuplicateX { index });
            }
        }

        let y = data.y_values();
        let variance = variance(&y);
        let line = slope_intercept(&x, &y);

        Ok(Self {
            length: y.len(),
            mean: mean(y.iter().copied()),
            variance,
            standard_deviation: variance.map(nalgebra::ComplexField::sqrt),
            slope: line.map(|(slope, _)| slope),
            intercept: line.map(|(_, intercept)| intercept),
            skewness: skewness(&y),
            kurtosis: kurtosis(&y),
        })
    }
}
