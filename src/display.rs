//! Utilities for rendering fitted functions as equations
//!
//! Functions build a list of [`Term`]s and hand them to [`format_equation`], which
//! joins them with the right signs into `"y(x) = ..."`.
//!
//! # Helpers
//! - [`format_coefficient`]: Formats a numeric coefficient, skipping zeros.
//! - [`format_variable`]: Renders `x`, `x²`, `x³`... with unicode exponents.
//! - [`format_value`]: Formats a signed value with the crate's default precision.
use crate::value::Value;

pub mod unicode;

/// Default precision for rendered coefficients
pub const DEFAULT_PRECISION: usize = 2;

/// Default range in which scientific notation is not used
#[must_use]
pub fn default_fixed_range<T: Value>() -> Option<std::ops::Range<T>> {
    const RANGE: std::ops::Range<f64> = 1e-3..1e3;
    let s = T::try_cast(RANGE.start).ok()?;
    let e = T::try_cast(RANGE.end).ok()?;
    Some(s..e)
}

/// Represents the sign of an equation term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive sign (`+` when displayed).
    Positive,

    /// Negative sign (`-` when displayed).
    Negative,
}

impl Sign {
    /// Determines the sign from a numeric coefficient.
    ///
    /// # Example
    /// ```
    /// # use lsqfit::display::Sign;
    /// assert_eq!(Sign::from_coef(3.0), Sign::Positive);
    /// assert_eq!(Sign::from_coef(-2.0), Sign::Negative);
    /// ```
    pub fn from_coef<T: Value>(coef: T) -> Self {
        if coef < T::zero() {
            Self::Negative
        } else {
            Self::Positive
        }
    }

    /// Returns the character representation of the sign.
    #[must_use]
    pub fn char(&self) -> char {
        match self {
            Sign::Positive => '+',
            Sign::Negative => '-',
        }
    }
}

/// A single term of an equation: a sign and the unsigned body (`"2.00x²"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// The sign of the term
    pub sign: Sign,

    /// The body of the term, without its sign
    pub body: String,
}

impl Term {
    /// Creates a new term with the given sign and body.
    #[must_use]
    pub fn new(sign: Sign, body: String) -> Self {
        Self { sign, body }
    }
}

/// Formats a numeric coefficient for display in a term.
///
/// - Returns `None` if the coefficient is zero or effectively zero (≤ epsilon).
/// - Returns an empty string for a coefficient of ±1 on a non-constant term.
/// - Formats as a decimal if the absolute value is between `1e-3` and `1e3`,
///   in scientific notation otherwise.
///
/// # Example
/// ```
/// # use lsqfit::display::format_coefficient;
/// assert_eq!(format_coefficient(0.0, 1, 2), None);
/// assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
/// assert_eq!(format_coefficient(1e5, 1, 2), Some("1.00e5".to_string()));
/// ```
pub fn format_coefficient<T: Value>(coef: T, degree: i32, precision: usize) -> Option<String> {
    let abs = Value::abs(coef);

    if abs <= T::epsilon() {
        return None;
    }

    if Value::abs(abs - T::one()) <= T::epsilon() && degree != 0 {
        return Some(String::new());
    }

    Some(unicode::float(abs, default_fixed_range(), precision))
}

/// Formats a signed value (including zero) with [`DEFAULT_PRECISION`].
///
/// # Example
/// ```
/// # use lsqfit::display::format_value;
/// assert_eq!(format_value(-0.5), "-0.50");
/// assert_eq!(format_value(2e4), "2.00e4");
/// ```
pub fn format_value<T: Value>(value: T) -> String {
    let body = unicode::float(Value::abs(value), default_fixed_range(), DEFAULT_PRECISION);
    match Sign::from_coef(value) {
        Sign::Negative => format!("-{body}"),
        Sign::Positive => body,
    }
}

/// Formats the variable part of a term.
///
/// - `exp == 0` gives an empty string
/// - `exp == 1` gives the base unchanged
/// - otherwise the exponent is appended in superscript
///
/// # Examples
/// ```
/// # use lsqfit::display::format_variable;
/// assert_eq!(format_variable("x", 0), "");
/// assert_eq!(format_variable("x", 1), "x");
/// assert_eq!(format_variable("x", 2), "x²");
/// ```
#[must_use]
pub fn format_variable(base: &str, exp: i32) -> String {
    match exp {
        0 => String::new(),
        1 => base.to_string(),
        _ => format!("{base}{}", unicode::superscript(&exp.to_string())),
    }
}

/// Writes `"y(x) = <terms>"`, joining terms with their signs.
///
/// An empty term list renders as `y(x) = 0`.
///
/// # Errors
/// Returns an error if writing to the buffer fails.
pub fn format_equation(
    buffer: &mut impl std::fmt::Write,
    terms: impl IntoIterator<Item = Term>,
) -> std::fmt::Result {
    write!(buffer, "y(x) = ")?;

    let mut empty = true;
    for (i, term) in terms.into_iter().enumerate() {
        empty = false;
        match (i, term.sign) {
            (0, Sign::Positive) => write!(buffer, "{}", term.body)?,
            (0, Sign::Negative) => write!(buffer, "-{}", term.body)?,
            (_, sign) => write!(buffer, " {} {}", sign.char(), term.body)?,
        }
    }

    if empty {
        write!(buffer, "0")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(coef: f64, degree: i32) -> Option<Term> {
        let sign = Sign::from_coef(coef);
        let coef_str = format_coefficient(coef, degree, DEFAULT_PRECISION)?;
        let body = format!("{coef_str}{}", format_variable("x", degree));
        Some(Term::new(sign, body))
    }

    #[test]
    fn test_sign_from_coef() {
        assert_eq!(Sign::from_coef(1.0), Sign::Positive);
        assert_eq!(Sign::from_coef(-1.0), Sign::Negative);
        assert_eq!(Sign::from_coef(0.0), Sign::Positive);
        assert_eq!(Sign::Negative.char(), '-');
    }

    #[test]
    fn test_format_coefficient() {
        assert_eq!(format_coefficient(2.5, 1, 2), Some("2.50".to_string()));
        assert_eq!(format_coefficient(-2.5, 1, 2), Some("2.50".to_string()));
        assert_eq!(format_coefficient(1e-20, 1, 2), None);
        assert_eq!(format_coefficient(1e-5, 2, 2), Some("1.00e-5".to_string()));
        assert_eq!(format_coefficient(-1.0, 1, 2), Some(String::new()));
        assert_eq!(format_coefficient(1.0, 0, 2), Some("1.00".to_string()));
    }

    #[test]
    fn test_format_variable() {
        assert_eq!(format_variable("x", 3), "x³");
        assert_eq!(format_variable("x", 12), "x¹²");
    }

    #[test]
    fn test_format_equation() {
        let mut buf = String::new();
        let terms = [4.0, 0.0, -3.0, 2.0]
            .iter()
            .zip([3, 2, 1, 0])
            .filter_map(|(&c, d)| term(c, d));
        format_equation(&mut buf, terms).unwrap();
        assert_eq!(buf, "y(x) = 4.00x³ - 3.00x + 2.00");

        let mut buf = String::new();
        format_equation(&mut buf, term(-1.0, 1)).unwrap();
        assert_eq!(buf, "y(x) = -x");

        let mut buf = String::new();
        format_equation(&mut buf, std::iter::empty()).unwrap();
        assert_eq!(buf, "y(x) = 0");
    }
}
