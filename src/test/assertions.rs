/// Asserts that two floating-point values are approximately equal.
///
/// This is useful for comparing computed values where exact equality is not expected due to rounding errors.
///
/// # Syntax
/// ```text
/// assert_close!(a, b);                        // tolerance: machine epsilon
/// assert_close!(a, b, tolerance);
/// assert_close!(a, b, msg = "context {}", x);
/// assert_close!(a, b, tolerance, msg = "context {}", x);
/// ```
///
/// # Panics
/// Panics if `|a - b|` exceeds the tolerance.
///
/// # Examples
/// ```
/// # use lsqfit::assert_close;
/// assert_close!(1.0 + 1e-16, 1.0);
/// assert_close!(0.1 + 0.2, 0.3, 1e-12, msg = "Nearly equal");
/// ```
#[macro_export]
macro_rules! assert_close {
    ($a:expr, $b:expr, msg = $msg:literal $(, $args:expr)* $(,)?) => {{
        let (a, b) = ($a, $b);
        let tolerance = $crate::test::epsilon_of(&a);
        $crate::assert_close!(a, b, tolerance, msg = $msg $(, $args)*)
    }};

    ($a:expr, $b:expr, $tolerance:expr, msg = $msg:literal $(, $args:expr)* $(,)?) => {{
        let (a, b, tolerance) = ($a, $b, $tolerance);
        if !$crate::test::is_close(a, b, tolerance) {
            let msg = format!($msg $(, $args)*);
            panic!("{msg}: {a} != {b} (tolerance {tolerance})");
        }
    }};

    ($a:expr, $b:expr, $tolerance:expr $(,)?) => {
        $crate::assert_close!($a, $b, $tolerance, msg = "Values not close")
    };

    ($a:expr, $b:expr $(,)?) => {
        $crate::assert_close!($a, $b, msg = "Values not close")
    };
}

/// Asserts that two sequences of floating-point values are approximately equal element-wise.
///
/// Both sides only need an `iter()` method and a `len()`, so slices, arrays and `Vec`s
/// can be mixed freely.
///
/// # Syntax
/// ```text
/// assert_all_close!(src, dst);             // tolerance: machine epsilon
/// assert_all_close!(src, dst, tolerance);
/// ```
///
/// # Panics
/// - If the lengths differ.
/// - If any pair of elements differ by more than the tolerance.
///
/// # Examples
/// ```
/// # use lsqfit::assert_all_close;
/// let computed = vec![0.1 + 0.2, 1.0];
/// assert_all_close!(computed, [0.3, 1.0], 1e-12);
/// ```
#[macro_export]
macro_rules! assert_all_close {
    ($src:expr, $dst:expr, $tolerance:expr $(,)?) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "Lengths differ");

        let tolerance = $tolerance;
        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, tolerance, msg = "element [{}]", i);
        }
    }};

    ($src:expr, $dst:expr $(,)?) => {{
        let (src, dst) = (&$src, &$dst);
        assert_eq!(src.len(), dst.len(), "Lengths differ");

        for (i, (s, d)) in src.iter().zip(dst.iter()).enumerate() {
            $crate::assert_close!(*s, *d, msg = "element [{}]", i);
        }
    }};
}

/// Asserts that a function produces an expected `y` value at a given `x`.
///
/// The function's parameters must be set. The tolerance defaults to machine epsilon.
///
/// # Examples
/// ```
/// # use lsqfit::{assert_y, function::LinearFunction};
/// let line = LinearFunction::with_parameters(1.0, 2.0);
/// assert_y!(&line, 2.0, 5.0);
/// assert_y!(&line, 0.1, 1.2, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_y {
    ($function:expr, $x:expr, $expected:expr $(, $tolerance:expr)? $(,)?) => {{
        use $crate::function::ParametricFunction;
        let function = $function;
        let x = $x;
        let y = match function.y(x) {
            Ok(y) => y,
            Err(e) => panic!("Could not evaluate {} at x = {x}: {e}", function.name()),
        };

        #[allow(unused_mut, unused_assignments)]
        let mut tolerance = $crate::test::epsilon_of(&y);
        $( tolerance = $tolerance; )?

        $crate::assert_close!(y, $expected, tolerance, msg = "{} at x = {}", function, x);
    }};
}

/// Asserts that a function's chi-squared against a data series does not exceed a threshold.
///
/// Chi-squared is computed with [`crate::fitting::LeastSquares`], weighting each residual
/// by the point's standard deviation.
///
/// On failure, the function and every point's residual are printed to stderr.
///
/// # Examples
/// ```
/// # use lsqfit::{assert_chi_squared, data::DataSeries, function::LinearFunction};
/// let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 3.0)]);
/// let line = LinearFunction::with_parameters(1.0, 2.0);
/// assert_chi_squared!(&data, &line, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_chi_squared {
    ($data:expr, $function:expr, $threshold:expr $(,)?) => {{
        use $crate::fitting::FigureOfMerit;
        use $crate::function::ParametricFunction;

        let (data, function) = ($data, $function);
        let threshold = $threshold;
        let chi_squared = match $crate::fitting::LeastSquares.calculate(data, function) {
            Ok(chi_squared) => chi_squared,
            Err(e) => panic!("Could not compute chi-squared for {}: {e}", function.name()),
        };

        if !(chi_squared <= threshold) {
            eprintln!("{function}");
            for point in data.iter() {
                if let Ok(y) = function.y(point.x()) {
                    eprintln!("  x = {}, y = {}, fit = {y}, residual = {}", point.x(), point.y(), point.y() - y);
                }
            }
            panic!("Chi-squared = {chi_squared} exceeds {threshold}");
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::{data::DataSeries, function::Polynomial};

    #[test]
    fn test_assert_close_forms() {
        assert_close!(1.0, 1.0);
        assert_close!(1.0, 1.0 + 1e-9, 1e-6);
        assert_close!(2.0_f32, 2.0_f32, msg = "f32 {}", 1);
        assert_close!(2.0, 2.05, 0.1, msg = "custom");
    }

    #[test]
    #[should_panic(expected = "Values not close")]
    fn test_assert_close_fails() {
        assert_close!(1.0, 1.1);
    }

    #[test]
    #[should_panic(expected = "element [1]")]
    fn test_assert_all_close_fails() {
        assert_all_close!([1.0, 2.0], [1.0, 2.5], 0.1);
    }

    #[test]
    fn test_assert_y() {
        let poly = Polynomial::from_coefficients(&[0.0, 0.0, 1.0]).unwrap();
        assert_y!(&poly, 3.0, 9.0);
        assert_y!(&poly, 0.5, 0.25, 1e-15);
    }

    #[test]
    fn test_assert_chi_squared() {
        let data = DataSeries::from(vec![(0.0, 1.0, 0.5), (1.0, 2.0, 0.5)]);
        let poly = Polynomial::from_coefficients(&[1.0, 1.5]).unwrap();

        // Residuals 0 and -0.5, each weighted by 1/0.25
        assert_chi_squared!(&data, &poly, 1.0 + 1e-12);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn test_assert_chi_squared_fails() {
        let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 2.0)]);
        let poly = Polynomial::from_coefficients(&[0.0, 0.0]).unwrap();
        assert_chi_squared!(&data, &poly, 1.0);
    }
}
