use std::sync::Arc;

use crate::{
    display::format_value,
    error::Result,
    function::{LinearCombination, NonLinearCombination, ParameterVector, ParametricFunction},
    value::Value,
};

type ValueFn<T> = Arc<dyn Fn(T, &[T]) -> T + Send + Sync>;
type DerivativeFn<T> = Arc<dyn Fn(T, &[T], usize) -> T + Send + Sync>;
type BasisFn<T> = Arc<dyn Fn(T, usize) -> T + Send + Sync>;

/// A non-linear model defined by closures.
///
/// The value closure receives `(x, parameters)`. Partial derivatives come from an
/// optional closure receiving `(x, parameters, index)`; without one, they are estimated
/// by central differences.
///
/// # Example
/// ```rust
/// # use lsqfit::function::{CustomFunction, NonLinearCombination, ParametricFunction};
/// // y = a·exp(b·x)
/// let mut growth = CustomFunction::new("Exponential", 2, |x: f64, p: &[f64]| p[0] * (p[1] * x).exp())
///     .with_derivative(|x, p, i| match i {
///         0 => (p[1] * x).exp(),
///         _ => p[0] * x * (p[1] * x).exp(),
///     });
///
/// growth.set_parameters(&[2.0, 0.0]).unwrap();
/// assert_eq!(growth.y(10.0).unwrap(), 2.0);
/// assert_eq!(growth.partial_derivative(3.0, 1).unwrap(), 6.0);
/// ```
#[derive(Clone)]
pub struct CustomFunction<T: Value = f64> {
    name: &'static str,
    parameters: ParameterVector<T>,
    value: ValueFn<T>,
    derivative: Option<DerivativeFn<T>>,
}
impl<T: Value> CustomFunction<T> {
    /// Creates a model with `degrees_of_freedom` unset parameters.
    pub fn new(
        name: &'static str,
        degrees_of_freedom: usize,
        value: impl Fn(T, &[T]) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            parameters: ParameterVector::new(degrees_of_freedom),
            value: Arc::new(value),
            derivative: None,
        }
    }

    /// Supplies analytic partial derivatives.
    #[must_use]
    pub fn with_derivative(
        mut self,
        derivative: impl Fn(T, &[T], usize) -> T + Send + Sync + 'static,
    ) -> Self {
        self.derivative = Some(Arc::new(derivative));
        self
    }

    /// True if partial derivatives are estimated numerically
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.derivative.is_none()
    }

    fn central_difference(&self, x: T, parameters: &[T], index: usize) -> T {
        let step = nalgebra::ComplexField::cbrt(T::epsilon())
            * nalgebra::RealField::max(Value::abs(parameters[index]), T::one());

        let mut shifted = parameters.to_vec();
        shifted[index] = parameters[index] + step;
        let up = (self.value)(x, &shifted);
        shifted[index] = parameters[index] - step;
        let down = (self.value)(x, &shifted);

        (up - down) / (T::two() * step)
    }
}

impl<T: Value> std::fmt::Debug for CustomFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomFunction")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("numeric", &self.is_numeric())
            .finish_non_exhaustive()
    }
}

impl<T: Value> ParametricFunction<T> for CustomFunction<T> {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn degrees_of_freedom(&self) -> usize {
        self.parameters.len()
    }

    fn set_parameters(&mut self, parameters: &[T]) -> Result<()> {
        self.parameters.set(parameters)
    }

    fn parameters(&self) -> Result<&[T]> {
        self.parameters.get(self.name)
    }

    fn y(&self, x: T) -> Result<T> {
        Ok((self.value)(x, self.parameters()?))
    }
}

impl<T: Value> NonLinearCombination<T> for CustomFunction<T> {
    fn partial_derivative(&self, x: T, index: usize) -> Result<T> {
        self.parameters.check_index(index)?;
        let parameters = self.parameters()?;

        Ok(match &self.derivative {
            Some(derivative) => derivative(x, parameters, index),
            None => self.central_difference(x, parameters, index),
        })
    }
}

impl<T: Value> std::fmt::Display for CustomFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Ok(parameters) = self.parameters() else {
            return write!(f, "{} (uninitialized)", self.name);
        };

        let parameters: Vec<_> = parameters.iter().map(|&p| format_value(p)).collect();
        write!(f, "{}(x; {})", self.name, parameters.join(", "))
    }
}

/// A linear combination of caller-supplied basis functions, `y(x) = Σ pᵢ·φᵢ(x)`.
///
/// The basis closure receives `(x, i)` and returns `φᵢ(x)`.
///
/// # Example
/// ```rust
/// # use lsqfit::function::{CustomBasis, LinearCombination, ParametricFunction};
/// // y = a·sin(x) + b·cos(x)
/// let mut wave = CustomBasis::new("Wave", 2, |x: f64, i| if i == 0 { x.sin() } else { x.cos() });
/// wave.set_parameters(&[0.0, 3.0]).unwrap();
/// assert_eq!(wave.y(0.0).unwrap(), 3.0);
/// assert_eq!(wave.basis_function(0.0, 1).unwrap(), 1.0);
/// ```
#[derive(Clone)]
pub struct CustomBasis<T: Value = f64> {
    name: &'static str,
    parameters: ParameterVector<T>,
    basis: BasisFn<T>,
}
impl<T: Value> CustomBasis<T> {
    /// Creates a combination of `degrees_of_freedom` basis functions with unset weights.
    pub fn new(
        name: &'static str,
        degrees_of_freedom: usize,
        basis: impl Fn(T, usize) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            parameters: ParameterVector::new(degrees_of_freedom),
            basis: Arc::new(basis),
        }
    }
}

impl<T: Value> std::fmt::Debug for CustomBasis<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomBasis")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl<T: Value> ParametricFunction<T> for CustomBasis<T> {
    fn name(&self) -> String {
        self.name.to_string()
    }

    fn degrees_of_freedom(&self) -> usize {
        self.parameters.len()
    }

    fn set_parameters(&mut self, parameters: &[T]) -> Result<()> {
        self.parameters.set(parameters)
    }

    fn parameters(&self) -> Result<&[T]> {
        self.parameters.get(self.name)
    }

    fn y(&self, x: T) -> Result<T> {
        let y = self
            .parameters()?
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (i, &p)| acc + p * (self.basis)(x, i));
        Ok(y)
    }
}

impl<T: Value> LinearCombination<T> for CustomBasis<T> {
    fn basis_function(&self, x: T, index: usize) -> Result<T> {
        self.parameters.check_index(index)?;
        Ok((self.basis)(x, index))
    }
}

impl<T: Value> NonLinearCombination<T> for CustomBasis<T> {
    fn partial_derivative(&self, x: T, index: usize) -> Result<T> {
        self.parameters()?;
        self.basis_function(x, index)
    }
}

impl<T: Value> std::fmt::Display for CustomBasis<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Ok(parameters) = self.parameters() else {
            return write!(f, "{} (uninitialized)", self.name);
        };

        write!(f, "y(x) = ")?;
        for (i, &p) in parameters.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{}·φ{}(x)", format_value(p), crate::display::unicode::subscript(&i.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_close, error::Error};

    fn exponential() -> CustomFunction {
        CustomFunction::new("Exponential", 2, |x: f64, p: &[f64]| p[0] * (p[1] * x).exp())
    }

    #[test]
    fn test_numeric_derivative() {
        let mut f = exponential();
        assert!(f.is_numeric());
        f.set_parameters(&[2.0, 0.5]).unwrap();

        for x in [0.0_f64, 1.0, 2.5] {
            let analytic_a = (0.5 * x).exp();
            let analytic_b = 2.0 * x * (0.5 * x).exp();
            assert_close!(f.partial_derivative(x, 0).unwrap(), analytic_a, 1e-8);
            assert_close!(f.partial_derivative(x, 1).unwrap(), analytic_b, 1e-8);
        }
    }

    #[test]
    fn test_uninitialized() {
        let f = exponential();
        assert_eq!(f.y(1.0), Err(Error::NotInitialized("Exponential")));
        assert!(f.partial_derivative(1.0, 0).is_err());
        assert_eq!(f.to_string(), "Exponential (uninitialized)");
    }

    #[test]
    fn test_index_checked() {
        let mut f = exponential();
        f.set_parameters(&[1.0, 1.0]).unwrap();
        assert!(matches!(
            f.partial_derivative(0.0, 2),
            Err(Error::IndexOutOfBounds { axis: "parameter", .. })
        ));
        assert_eq!(f.to_string(), "Exponential(x; 1.00, 1.00)");
    }

    #[test]
    fn test_custom_basis() {
        let mut f = CustomBasis::new("Quadratic", 3, |x: f64, i| x.powi(i as i32));
        f.set_parameters(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(f.y(2.0).unwrap(), 17.0);
        assert_eq!(f.basis_function(2.0, 2).unwrap(), 4.0);
        assert_eq!(f.partial_derivative(2.0, 1).unwrap(), 2.0);
        assert!(f.basis_function(2.0, 3).is_err());
        assert_eq!(f.to_string(), "y(x) = 1.00·φ₀(x) + 2.00·φ₁(x) + 3.00·φ₂(x)");
    }
}
