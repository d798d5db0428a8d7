//! # lsqfit
//! ## Weighted least-squares curve fitting
//!
//! Give it measurements with error bars and a function with unknown parameters, and it
//! finds the parameters that minimize chi-squared, the weighted sum of squared residuals.
//!
//! Two engines cover the two kinds of model:
//! - [`fitting::LinearFit`] for functions that are a weighted sum of basis functions
//!   (polynomials, Fourier-style sums). One solve of the normal equations, no starting point.
//! - [`fitting::LevenbergMarquardt`] for anything else with partial derivatives
//!   (peaks, exponential decays). Iterates from a starting point until chi-squared stops improving.
//!
//! Both can hold any subset of the parameters fixed with a [`fitting::FitMask`].
//!
//! The simplest use-case is fitting a straight line:
//! ```rust
//! use lsqfit::{assert_all_close, data::DataSeries, fitting::LinearFit, function::{LinearFunction, ParametricFunction}};
//!
//! let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
//! let mut line = LinearFunction::new();
//!
//! LinearFit::new(&data, &mut line).unwrap().fit().unwrap();
//! assert_all_close!(line.parameters().unwrap(), [1.0, 2.0], 1e-12);
//! println!("{line}"); // y(x) = 2.00x + 1.00
//! ```
//!
//! And a non-linear model, starting from a rough guess:
//! ```rust
//! use lsqfit::{data::DataSeries, fitting::{LevenbergMarquardt, DEFAULT_MAX_STEPS}, function::GaussianFunction};
//!
//! let truth = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
//! let data = DataSeries::sample_interval(&truth, 0.0..=4.0, 41).unwrap();
//!
//! let mut peak = GaussianFunction::with_parameters(0.5, 4.0, 1.8, 1.2);
//! let mut fit = LevenbergMarquardt::new(&data, &mut peak).unwrap();
//! fit.fit(DEFAULT_MAX_STEPS).unwrap();
//!
//! println!("{}", fit.report().unwrap());
//! ```
//!
//! # Core Concepts
//! - A [`data::DataSeries`] is a list of `(x, y, error)` points.
//!     - An error of `0` means "unweighted"; the point counts with unit standard deviation.
//! - A function implements [`function::ParametricFunction`], plus one or both capabilities:
//!     - [`function::LinearCombination`] exposes its basis functions.
//!     - [`function::NonLinearCombination`] exposes partial derivatives.
//! - The **degrees of freedom** of a function is the length of its parameter vector.
//! - A fit writes its result into the function's parameters.
//!     - Covariance matrices and a [`fitting::FitReport`] describe how well-determined they are.
//!
//! # Implementation Details
//!
//! Both engines solve their linear systems with a full-pivot Gauss-Jordan elimination
//! ([`linalg::GaussJordan`]) over a bounds-checked [`linalg::Matrix`] backed by `nalgebra`.
//!
//! # Testing utilities
//!
//! This crate includes a set of assertion macros for checking fits and numeric code. See [`test`].
//!
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)] // The worst clippy lint
#![allow(clippy::cast_precision_loss)] // I don't care about this one
#![allow(clippy::similar_names)] //       Clippy does not get to decide what names are similar
#![cfg_attr(docsrs, feature(doc_cfg))]


#[cfg(feature = "transforms")]
#[cfg_attr(docsrs, doc(cfg(feature = "transforms")))]
pub mod transforms;

pub mod data;
pub mod display;
pub mod error;
pub mod fitting;
pub mod function;
pub mod linalg;
pub mod statistics;
pub mod value;

pub use data::{DataPoint, DataSeries};
pub use error::{Error, Result};
pub use fitting::{FitMask, LevenbergMarquardt, LinearFit};

pub use nalgebra;
