use crate::{
    display::{self, Sign, Term, DEFAULT_PRECISION},
    error::{Error, Result},
    function::{LinearCombination, NonLinearCombination, ParameterVector, ParametricFunction},
    value::Value,
};

/// Polynomial in the monomial basis, `y(x) = a₀ + a₁x + a₂x² + … + aₙxⁿ`.
///
/// A polynomial of order `n` has `n + 1` parameters, `[a₀, a₁, …, aₙ]`.
///
/// It is linear in its parameters, so it implements both capabilities:
/// the `i`-th basis function and `∂y/∂aᵢ` are both `xⁱ`.
///
/// # Example
/// ```rust
/// # use lsqfit::function::{ParametricFunction, Polynomial};
/// let mut poly = Polynomial::new(2);
/// poly.set_parameters(&[1.0, 0.0, 2.0]).unwrap();
///
/// assert_eq!(poly.y(3.0).unwrap(), 19.0);
/// assert_eq!(poly.to_string(), "y(x) = 2.00x² + 1.00");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polynomial<T: Value = f64> {
    order: usize,
    parameters: ParameterVector<T>,
}
impl<T: Value> Polynomial<T> {
    /// Creates a polynomial of the given order with unset parameters.
    #[must_use]
    pub fn new(order: usize) -> Self {
        Self {
            order,
            parameters: ParameterVector::new(order + 1),
        }
    }

    /// Creates a polynomial from its coefficients, lowest power first.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if `coefficients` is empty.
    pub fn from_coefficients(coefficients: &[T]) -> Result<Self> {
        let order = coefficients
            .len()
            .checked_sub(1)
            .ok_or(Error::DimensionMismatch {
                context: "polynomial coefficients",
                expected: 1,
                found: 0,
            })?;

        let mut poly = Self::new(order);
        poly.set_parameters(coefficients)?;
        Ok(poly)
    }

    /// The highest power of `x`
    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    fn terms(coefficients: &[T]) -> impl Iterator<Item = Term> + '_ {
        coefficients.iter().enumerate().rev().filter_map(|(power, &coef)| {
            let power = i32::try_from(power).unwrap_or(i32::MAX);
            let coef_str = display::format_coefficient(coef, power, DEFAULT_PRECISION)?;
            let body = format!("{coef_str}{}", display::format_variable("x", power));
            Some(Term::new(Sign::from_coef(coef), body))
        })
    }
}

impl<T: Value> ParametricFunction<T> for Polynomial<T> {
    fn name(&self) -> String {
        format!("Polynomial of order {}", self.order)
    }

    fn degrees_of_freedom(&self) -> usize {
        self.order + 1
    }

    fn set_parameters(&mut self, parameters: &[T]) -> Result<()> {
        self.parameters.set(parameters)
    }

    fn parameters(&self) -> Result<&[T]> {
        self.parameters.get("Polynomial")
    }

    fn y(&self, x: T) -> Result<T> {
        // Horner's method
        let y = self
            .parameters()?
            .iter()
            .rev()
            .fold(T::zero(), |acc, &coef| acc * x + coef);
        Ok(y)
    }
}

impl<T: Value> LinearCombination<T> for Polynomial<T> {
    fn basis_function(&self, x: T, index: usize) -> Result<T> {
        self.parameters.check_index(index)?;
        Ok(Value::powu(x, index))
    }
}

impl<T: Value> NonLinearCombination<T> for Polynomial<T> {
    fn partial_derivative(&self, x: T, index: usize) -> Result<T> {
        self.parameters.check_index(index)?;
        self.parameters()?;
        Ok(Value::powu(x, index))
    }
}

impl<T: Value> std::fmt::Display for Polynomial<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parameters() {
            Ok(coefficients) => display::format_equation(f, Self::terms(coefficients)),
            Err(_) => write!(f, "{} (uninitialized)", self.name()),
        }
    }
}

/// A straight line, `y(x) = a₀ + a₁x`.
///
/// Equivalent to a [`Polynomial`] of order 1.
///
/// # Example
/// ```rust
/// # use lsqfit::function::{ParametricFunction, LinearFunction};
/// let mut line = LinearFunction::new();
/// line.set_parameters(&[1.0, 2.0]).unwrap();
/// assert_eq!(line.y(2.0).unwrap(), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LinearFunction<T: Value = f64>(Polynomial<T>);
impl<T: Value> LinearFunction<T> {
    /// Creates a line with unset parameters.
    #[must_use]
    pub fn new() -> Self {
        Self(Polynomial::new(1))
    }

    /// Creates the line `y = intercept + slope·x`.
    #[must_use]
    pub fn with_parameters(intercept: T, slope: T) -> Self {
        let mut line = Self::new();
        line.0.parameters.values = Some(vec![intercept, slope]);
        line
    }

    /// The underlying order-1 polynomial
    #[must_use]
    pub fn as_polynomial(&self) -> &Polynomial<T> {
        &self.0
    }
}

impl<T: Value> Default for LinearFunction<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> ParametricFunction<T> for LinearFunction<T> {
    fn name(&self) -> String {
        "Linear function".to_string()
    }

    fn degrees_of_freedom(&self) -> usize {
        self.0.degrees_of_freedom()
    }

    fn set_parameters(&mut self, parameters: &[T]) -> Result<()> {
        self.0.set_parameters(parameters)
    }

    fn parameters(&self) -> Result<&[T]> {
        self.0.parameters.get("LinearFunction")
    }

    fn y(&self, x: T) -> Result<T> {
        self.parameters()?;
        self.0.y(x)
    }
}

impl<T: Value> LinearCombination<T> for LinearFunction<T> {
    fn basis_function(&self, x: T, index: usize) -> Result<T> {
        self.0.basis_function(x, index)
    }
}

impl<T: Value> NonLinearCombination<T> for LinearFunction<T> {
    fn partial_derivative(&self, x: T, index: usize) -> Result<T> {
        self.0.parameters.check_index(index)?;
        self.parameters()?;
        Ok(Value::powu(x, index))
    }
}

impl<T: Value> std::fmt::Display for LinearFunction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.parameters() {
            Ok(_) => write!(f, "{}", self.0),
            Err(_) => write!(f, "{} (uninitialized)", self.name()),
        }
    }
}
