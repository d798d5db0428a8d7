//! Utilities for adding synthetic noise to data
//!
//! Data can be transformed by anything implementing the [`Transform`] trait, which applies
//! the transformation over a set of values.
//!
//! Noise is the main use: fitting clean samples of a known function and checking the
//! engine recovers its parameters is only half a test. Adding noise with a fixed seed
//! gives a reproducible, realistic series.
//!
//! # Noise: [`NoiseTransform`] / [`ApplyNoise`]
//! - Gaussian noise: [`NoiseTransform::Gaussian`]
//!   - [`ApplyNoise::apply_normal_noise`] applies it to the y-values of a [`crate::data::DataSeries`]
//!     and records `sigma` as each point's error.
//! - Uniform noise: [`NoiseTransform::Uniform`]
//!   - [`ApplyNoise::apply_uniform_noise`] applies it to the y-values, recording the matching
//!     standard deviation as each point's error.
//!
//! # Example
//! ```rust
//! use lsqfit::{data::DataSeries, function::LinearFunction, transforms::ApplyNoise};
//!
//! let line = LinearFunction::with_parameters(1.0, 2.0);
//! let data = DataSeries::sample_interval(&line, 0.0..=10.0, 50)
//!     .unwrap()
//!     .apply_normal_noise(0.1, Some(42))
//!     .unwrap();
//!
//! assert_eq!(data[0].error(), 0.1);
//! ```
use crate::{error::Result, value::Value};

mod noise;
pub use noise::{ApplyNoise, NoiseTransform};

pub use rand;
pub use rand_distr;

/// Trait for applying transformations to data.
pub trait Transform<T: Value> {
    /// Applies the transformation to the given data.
    ///
    /// # Errors
    /// Returns an error if the transformation's parameters are invalid.
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()>;
}
