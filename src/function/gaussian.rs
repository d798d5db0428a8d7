use crate::{
    display::format_value,
    error::Result,
    function::{NonLinearCombination, ParameterVector, ParametricFunction},
    value::Value,
};

/// A Gaussian peak on a constant baseline.
///
/// ```math
/// y(x) = offset + height · exp(-((x - center) / width)²)
/// ```
///
/// Parameters are ordered `[offset, height, center, width]`.
///
/// The function is not linear in `center` or `width`, so it can only be fitted with
/// [`crate::fitting::LevenbergMarquardt`].
///
/// # Example
/// ```rust
/// # use lsqfit::function::{ParametricFunction, GaussianFunction};
/// let peak = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
/// assert_eq!(peak.y(2.0).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GaussianFunction<T: Value = f64> {
    parameters: ParameterVector<T>,
}
impl<T: Value> GaussianFunction<T> {
    /// Index of the baseline offset in the parameter vector
    pub const OFFSET: usize = 0;

    /// Index of the peak height
    pub const HEIGHT: usize = 1;

    /// Index of the peak center
    pub const CENTER: usize = 2;

    /// Index of the peak width
    pub const WIDTH: usize = 3;

    /// Creates a Gaussian with unset parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parameters: ParameterVector::new(4),
        }
    }

    /// Creates a Gaussian with the given parameters.
    #[must_use]
    pub fn with_parameters(offset: T, height: T, center: T, width: T) -> Self {
        let mut parameters = ParameterVector::new(4);
        parameters.values = Some(vec![offset, height, center, width]);
        Self { parameters }
    }

    /// `(offset, height, center, width)`
    fn unpack(&self) -> Result<(T, T, T, T)> {
        let p = self.parameters()?;
        Ok((p[0], p[1], p[2], p[3]))
    }
}

impl<T: Value> Default for GaussianFunction<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> ParametricFunction<T> for GaussianFunction<T> {
    fn name(&self) -> String {
        "Gaussian function".to_string()
    }

    fn degrees_of_freedom(&self) -> usize {
        4
    }

    fn set_parameters(&mut self, parameters: &[T]) -> Result<()> {
        self.parameters.set(parameters)
    }

    fn parameters(&self) -> Result<&[T]> {
        self.parameters.get("GaussianFunction")
    }

    fn y(&self, x: T) -> Result<T> {
        let (offset, height, center, width) = self.unpack()?;
        let arg = (x - center) / width;
        Ok(offset + height * (-arg * arg).exp())
    }
}

impl<T: Value> NonLinearCombination<T> for GaussianFunction<T> {
    fn partial_derivative(&self, x: T, index: usize) -> Result<T> {
        self.parameters.check_index(index)?;
        let (_, height, center, width) = self.unpack()?;

        let arg = (x - center) / width;
        let ex = (-arg * arg).exp();
        let factor = height * ex * T::two() * arg;

        Ok(match index {
            0 => T::one(),
            1 => ex,
            2 => factor / width,
            _ => factor * arg / width,
        })
    }
}

impl<T: Value> std::fmt::Display for GaussianFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.unpack() {
            Ok((offset, height, center, width)) => write!(
                f,
                "y(x) = {} + {}·exp(-((x - {}) / {})²)",
                format_value(offset),
                format_value(height),
                format_value(center),
                format_value(width)
            ),
            Err(_) => write!(f, "{} (uninitialized)", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_close, error::Error};

    #[test]
    fn test_evaluate() {
        let peak = GaussianFunction::with_parameters(1.0, 5.0, 2.0, 1.0);
        assert_eq!(peak.y(2.0).unwrap(), 6.0);
        assert_close!(peak.y(3.0).unwrap(), 1.0 + 5.0 * (-1.0_f64).exp());
        assert_close!(peak.y(1.0).unwrap(), peak.y(3.0).unwrap());
    }

    #[test]
    fn test_uninitialized() {
        let peak = GaussianFunction::<f64>::new();
        assert_eq!(peak.y(0.0), Err(Error::NotInitialized("GaussianFunction")));
        assert!(peak.partial_derivative(0.0, 0).is_err());
        assert_eq!(peak.to_string(), "Gaussian function (uninitialized)");
    }

    #[test]
    fn test_partial_derivatives_match_finite_differences() {
        let params = [0.5, 5.0, 2.0, 1.5];
        let peak = GaussianFunction::with_parameters(params[0], params[1], params[2], params[3]);
        let h = 1e-6;

        for x in [0.0, 1.3, 2.0, 3.7] {
            for i in 0..4 {
                let mut up = params;
                up[i] += h;
                let mut down = params;
                down[i] -= h;

                let mut shifted = GaussianFunction::new();
                shifted.set_parameters(&up).unwrap();
                let y_up = shifted.y(x).unwrap();
                shifted.set_parameters(&down).unwrap();
                let y_down = shifted.y(x).unwrap();

                let numeric = (y_up - y_down) / (2.0 * h);
                assert_close!(peak.partial_derivative(x, i).unwrap(), numeric, 1e-6);
            }
        }
    }

    #[test]
    fn test_offset_derivative_is_one() {
        let peak = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
        assert_eq!(peak.partial_derivative(100.0, GaussianFunction::<f64>::OFFSET).unwrap(), 1.0);
        assert!(peak.partial_derivative(0.0, 4).is_err());
    }

    #[test]
    fn test_display() {
        let peak = GaussianFunction::with_parameters(0.0, 5.0, -2.0, 1.0);
        assert_eq!(
            peak.to_string(),
            "y(x) = 0.00 + 5.00·exp(-((x - -2.00) / 1.00)²)"
        );
    }
}
