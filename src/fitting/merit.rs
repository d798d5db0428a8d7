use crate::{data::DataSeries, error::Result, function::ParametricFunction, value::Value};

/// Scores how well a function describes a data series. Lower is better.
pub trait FigureOfMerit<T: Value = f64> {
    /// Evaluates the figure of merit for `function` at its current parameters.
    ///
    /// # Errors
    /// Returns an error if the function cannot be evaluated.
    fn calculate<F: ParametricFunction<T> + ?Sized>(
        &self,
        data: &DataSeries<T>,
        function: &F,
    ) -> Result<T>;
}

/// Weighted sum of squared residuals (chi-squared).
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// χ² = Σ ((y_i - f(x_i)) / σ_i)²
/// where
///   σ_i = the point's standard deviation, with 1 substituted for a recorded error of 0
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, fitting::{FigureOfMerit, LeastSquares}, function::LinearFunction};
/// let data = DataSeries::from(vec![(0.0, 1.0, 0.5), (1.0, 4.0, 0.0)]);
/// let line = LinearFunction::with_parameters(1.0, 2.0);
///
/// // (0 / 0.5)² + (1 / 1)²
/// assert_eq!(LeastSquares.calculate(&data, &line).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquares;
impl<T: Value> FigureOfMerit<T> for LeastSquares {
    fn calculate<F: ParametricFunction<T> + ?Sized>(
        &self,
        data: &DataSeries<T>,
        function: &F,
    ) -> Result<T> {
        let mut chi_squared = T::zero();
        for point in data {
            let residual = (point.y() - function.y(point.x())?) / point.std_deviation();
            chi_squared += residual * residual;
        }
        Ok(chi_squared)
    }
}
