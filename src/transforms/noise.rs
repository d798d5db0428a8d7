use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::{
    data::{DataPoint, DataSeries},
    error::{Error, Result},
    transforms::Transform,
    value::Value,
};

/// Types of noise based transforms for data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseTransform<T: Value> {
    /// Adds independent Gaussian noise to each value.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// xₙ = x + εₙ
    /// where
    ///   εₙ ~ N(0, sigma²), x = uncorrupted value
    /// ```
    /// </div>
    Gaussian {
        /// Standard deviation of the noise. Must not be negative.
        sigma: T,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },

    /// Adds uniform noise to each value.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// xₙ = x + εₙ
    /// where
    ///   εₙ ~ U(−strength, +strength), x = uncorrupted value
    /// ```
    /// </div>
    Uniform {
        /// Maximum deviation from the original value. A strength of zero leaves the data unchanged.
        strength: T,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },
}
impl<T: Value> NoiseTransform<T> {
    fn seed(&self) -> Option<u64> {
        match self {
            NoiseTransform::Gaussian { seed, .. } | NoiseTransform::Uniform { seed, .. } => *seed,
        }
    }

    fn rng(seed: Option<u64>) -> rand::rngs::SmallRng {
        match seed {
            Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
            None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Standard deviation of the noise this transform adds.
    ///
    /// For uniform noise on `[-s, s]` this is `s / √3`.
    #[must_use]
    pub fn std_deviation(&self) -> T {
        match self {
            NoiseTransform::Gaussian { sigma, .. } => Value::abs(*sigma),
            NoiseTransform::Uniform { strength, .. } => {
                Value::abs(*strength) / nalgebra::ComplexField::sqrt(T::two() + T::one())
            }
        }
    }
}
impl<T: Value> Transform<T> for NoiseTransform<T>
where
    T: num_traits::Float + rand_distr::uniform::SampleUniform,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()> {
        let mut rng = Self::rng(self.seed());
        match self {
            NoiseTransform::Gaussian { sigma, .. } => {
                let gaussian = Normal::new(T::zero(), *sigma)
                    .map_err(|e| Error::InvalidDistribution(e.to_string()))?;
                for v in data {
                    *v += gaussian.sample(&mut rng);
                }
            }

            NoiseTransform::Uniform { strength, .. } => {
                let strength = Value::abs(*strength);
                if strength == T::zero() {
                    return Ok(());
                }

                let uniform = Uniform::new(-strength, strength)
                    .map_err(|e| Error::InvalidDistribution(e.to_string()))?;
                for v in data {
                    *v += uniform.sample(&mut rng);
                }
            }
        }

        Ok(())
    }
}

/// Trait for applying noise to the y-values of a data series.
///
/// Each noisy point's error is set to the standard deviation of the added noise, so the
/// fitting engines weight it accordingly.
pub trait ApplyNoise<T: Value>: Sized {
    /// Adds Gaussian noise with standard deviation `sigma` to every y-value, and records
    /// `sigma` as each point's error.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDistribution`] if `sigma` is negative or not finite.
    ///
    /// # Example
    /// ```rust
    /// # use lsqfit::{data::DataSeries, transforms::ApplyNoise};
    /// let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 1.0)]);
    /// let a = data.clone().apply_normal_noise(0.5, Some(7)).unwrap();
    /// let b = data.apply_normal_noise(0.5, Some(7)).unwrap();
    /// assert_eq!(a, b);
    /// ```
    fn apply_normal_noise(self, sigma: T, seed: Option<u64>) -> Result<Self>;

    /// Adds uniform noise on `[-strength, strength]` to every y-value, and records its
    /// standard deviation `strength / √3` as each point's error.
    ///
    /// # Errors
    /// Returns [`Error::InvalidDistribution`] if `strength` is not finite.
    fn apply_uniform_noise(self, strength: T, seed: Option<u64>) -> Result<Self>;
}

/// Applies `noise` to the y-values and replaces every error with its standard deviation.
fn with_noise<T>(data: &DataSeries<T>, noise: &NoiseTransform<T>) -> Result<DataSeries<T>>
where
    T: Value + num_traits::Float + rand_distr::uniform::SampleUniform,
    rand_distr::StandardNormal: Distribution<T>,
{
    let mut y = data.y_values();
    noise.apply(y.iter_mut())?;

    let error = noise.std_deviation();
    Ok(data
        .iter()
        .zip(y)
        .map(|(point, y)| DataPoint::new(point.x(), y, error))
        .collect())
}

impl<T: Value> ApplyNoise<T> for DataSeries<T>
where
    T: num_traits::Float + rand_distr::uniform::SampleUniform,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply_normal_noise(self, sigma: T, seed: Option<u64>) -> Result<Self> {
        with_noise(&self, &NoiseTransform::Gaussian { sigma, seed })
    }

    fn apply_uniform_noise(self, strength: T, seed: Option<u64>) -> Result<Self> {
        with_noise(&self, &NoiseTransform::Uniform { strength, seed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics::{mean, std_dev};

    fn differences(clean: &DataSeries, noisy: &DataSeries) -> Vec<f64> {
        clean
            .iter()
            .zip(noisy.iter())
            .map(|(a, b)| b.y() - a.y())
            .collect()
    }

    #[test]
    fn test_gaussian() {
        let data: DataSeries = (0..1000).map(|i| (f64::from(i), 2.0)).collect();
        let noisy = data.clone().apply_normal_noise(0.1, Some(42)).unwrap();

        let diffs = differences(&data, &noisy);
        assert!(mean(diffs.iter().copied()).abs() < 0.02);
        assert!((std_dev(&diffs).unwrap() - 0.1).abs() < 0.02);

        assert_eq!(noisy[10].x(), 10.0);
        assert_eq!(noisy[10].error(), 0.1);
    }

    #[test]
    fn test_uniform() {
        let data: DataSeries = (0..1000).map(|i| (f64::from(i), 2.0)).collect();
        let noisy = data.clone().apply_uniform_noise(0.3, Some(42)).unwrap();

        let diffs = differences(&data, &noisy);
        assert!(diffs.iter().all(|d| d.abs() <= 0.3 + 1e-12));
        assert!((std_dev(&diffs).unwrap() - 0.3 / 3.0_f64.sqrt()).abs() < 0.02);
        assert!((noisy[0].error() - 0.3 / 3.0_f64.sqrt()).abs() < 1e-12);

        let unchanged = data.clone().apply_uniform_noise(0.0, None).unwrap();
        assert_eq!(unchanged.y_values(), data.y_values());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let data: DataSeries = (0..10).map(|i| (f64::from(i), 0.0)).collect();
        let a = data.clone().apply_normal_noise(1.0, Some(1)).unwrap();
        let b = data.clone().apply_normal_noise(1.0, Some(1)).unwrap();
        let c = data.apply_normal_noise(1.0, Some(2)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_sigma() {
        let data = DataSeries::from(vec![(0.0, 1.0)]);
        assert!(matches!(
            data.clone().apply_normal_noise(-1.0, None),
            Err(Error::InvalidDistribution(_))
        ));
        assert!(matches!(
            data.apply_uniform_noise(f64::INFINITY, None),
            Err(Error::InvalidDistribution(_))
        ));
    }
}
