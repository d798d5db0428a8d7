//! Fitting engines and the pieces they share.
//!
//! Two strategies are provided, chosen by what the function can do:
//! - [`LinearFit`] solves the normal equations once. It needs a [`crate::function::LinearCombination`].
//! - [`LevenbergMarquardt`] refines the parameters step by step. It needs a
//!   [`crate::function::NonLinearCombination`] and a starting point.
//!
//! Both are built around a [`FitContext`], which holds the data and a [`FitMask`] selecting
//! which parameters may change. Fixed parameters keep the values already set on the function.
//!
//! Fit quality is scored with a [`FigureOfMerit`]; [`LeastSquares`] (chi-squared) is the one
//! both engines minimize. A [`FitReport`] summarizes a finished fit.
//!
//! # Example
//! ```rust
//! # use lsqfit::{data::DataSeries, fitting::{FitMask, LinearFit}, function::{LinearFunction, ParametricFunction}};
//! let data = DataSeries::from(vec![(0.0_f64, 10.0), (1.0, 13.1), (2.0, 15.9), (3.0, 19.0)]);
//!
//! // Hold the intercept at 10, fit the slope
//! let mut line = LinearFunction::with_parameters(10.0, 0.0);
//! let mut fit = LinearFit::with_mask(&data, &mut line, Some(FitMask::from([false, true]))).unwrap();
//! fit.fit().unwrap();
//!
//! let report = fit.report().unwrap();
//! assert_eq!(report.parameters[0], 10.0);
//! assert!((report.parameters[1] - 3.0).abs() < 0.05);
//! ```
mod context;
mod levenberg_marquardt;
mod linear;
mod merit;
mod report;

pub mod multistart;

pub use context::{FitContext, FitMask};
pub use levenberg_marquardt::{
    FitStatus, LevenbergMarquardt, LevenbergMarquardtOptions, Step, DEFAULT_MAX_STEPS,
};
pub use linear::LinearFit;
pub use merit::{FigureOfMerit, LeastSquares};
pub use multistart::multistart;
pub use report::FitReport;
