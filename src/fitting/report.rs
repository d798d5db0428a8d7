use crate::{
    display::format_value,
    error::Result,
    fitting::FitContext,
    function::ParametricFunction,
    linalg::Matrix,
    value::Value,
};

/// Summary of a finished fit.
///
/// Serializable with `serde`, for logging results or comparing runs.
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, fitting::LinearFit, function::Polynomial};
/// let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 2.9), (2.0, 5.1), (3.0, 7.0)]);
/// let mut line = Polynomial::new(1);
/// let mut fit = LinearFit::new(&data, &mut line).unwrap();
/// fit.fit().unwrap();
///
/// let report = fit.report().unwrap();
/// assert_eq!(report.degrees_of_freedom(), 2);
/// println!("{report}");
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FitReport<T: Value = f64> {
    /// Name of the fitted function
    pub function: String,

    /// Final parameter vector, fixed parameters included
    pub parameters: Vec<T>,

    /// Which parameters were free during the fit
    pub free: Vec<bool>,

    /// `√cov[i,i]` for each free parameter, `0` for fixed ones.
    ///
    /// `None` if no covariance matrix was available.
    pub standard_errors: Option<Vec<T>>,

    /// Weighted sum of squared residuals
    pub chi_squared: T,

    /// `χ² / (points - free parameters)`, when there are more points than free parameters
    pub reduced_chi_squared: Option<T>,

    /// Number of solver iterations (1 for a linear fit)
    pub iterations: usize,

    /// Number of data points
    pub data_points: usize,

    /// Number of free parameters
    pub free_parameters: usize,
}
impl<T: Value> FitReport<T> {
    /// Builds a report for `function` at its current parameters.
    ///
    /// `covariance` is over the free parameters only.
    ///
    /// # Errors
    /// Returns an error if the function has no parameters, or the covariance shape is wrong.
    pub fn new<F: ParametricFunction<T> + ?Sized>(
        context: &FitContext<'_, T>,
        function: &F,
        chi_squared: T,
        iterations: usize,
        covariance: Option<&Matrix<T>>,
    ) -> Result<Self> {
        let data_points = context.data().len();
        let free_parameters = context.free_count();

        let reduced_chi_squared = data_points
            .checked_sub(free_parameters)
            .filter(|&dof| dof > 0)
            .map(|dof| chi_squared / T::from_positive_int(dof));

        let standard_errors = match covariance {
            Some(covariance) => {
                let full = context.expand_covariance(covariance)?;
                let errors = (0..context.total_parameters())
                    .map(|i| {
                        if context.mask().is_free(i) {
                            Ok(Value::abs(full.get(i, i)?).sqrt())
                        } else {
                            Ok(T::zero())
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Some(errors)
            }
            None => None,
        };

        Ok(Self {
            function: function.name(),
            parameters: function.parameters()?.to_vec(),
            free: context.mask().as_slice().to_vec(),
            standard_errors,
            chi_squared,
            reduced_chi_squared,
            iterations,
            data_points,
            free_parameters,
        })
    }

    /// Statistical degrees of freedom of the residuals, `points - free parameters`
    #[must_use]
    pub fn degrees_of_freedom(&self) -> usize {
        self.data_points.saturating_sub(self.free_parameters)
    }
}

impl<T: Value> std::fmt::Display for FitReport<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} points, {} of {} parameters free, {} iterations",
            self.function,
            self.data_points,
            self.free_parameters,
            self.parameters.len(),
            self.iterations
        )?;

        write!(f, "χ² = {}", format_value(self.chi_squared))?;
        if let Some(reduced) = self.reduced_chi_squared {
            write!(f, " (reduced {})", format_value(reduced))?;
        }
        writeln!(f)?;

        for (i, &value) in self.parameters.iter().enumerate() {
            let fixed = if self.free[i] { "" } else { " (fixed)" };
            match &self.standard_errors {
                Some(errors) if self.free[i] => {
                    writeln!(f, "  p{i} = {} ± {}", format_value(value), format_value(errors[i]))?;
                }
                _ => writeln!(f, "  p{i} = {}{fixed}", format_value(value))?,
            }
        }

        Ok(())
    }
}
