use crate::{
    data::DataSeries,
    error::{Error, Result},
    fitting::{FigureOfMerit, FitContext, FitMask, FitReport, LeastSquares},
    function::LinearCombination,
    linalg::{GaussJordan, Matrix},
    value::Value,
};

/// One-shot weighted least-squares fit of a linear combination of basis functions.
///
/// Builds the normal equations over the free parameters and solves them once with
/// [`GaussJordan`]. The fitted parameters are written back into the function.
///
/// Fixed parameters keep their current values; their contribution is subtracted
/// from each observation before the free parameters are solved for.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// For each point i, with basis values φ_j(x_i) and weight w_i = 1 / σ_i²:
///   ŷ_i = y_i - Σ_{j fixed} p_j·φ_j(x_i)
///   α[l,m] += w_i·φ_l(x_i)·φ_m(x_i)
///   β[l]   += w_i·φ_l(x_i)·ŷ_i
/// then solve α·p = β over the free parameters l, m.
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, fitting::LinearFit, function::{ParametricFunction, Polynomial}};
/// let data = DataSeries::from(vec![(0.0_f64, 1.0), (1.0, 3.0), (2.0, 5.0)]);
/// let mut line = Polynomial::new(1);
///
/// let mut fit = LinearFit::new(&data, &mut line).unwrap();
/// fit.fit().unwrap();
/// assert_eq!(fit.chi_squared().unwrap(), 0.0);
///
/// let parameters = line.parameters().unwrap();
/// assert!((parameters[0] - 1.0).abs() < 1e-12);
/// assert!((parameters[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct LinearFit<'a, F, T: Value = f64>
where
    F: LinearCombination<T>,
{
    context: FitContext<'a, T>,
    function: &'a mut F,
    covariance: Option<Matrix<T>>,
}
impl<'a, F, T: Value> LinearFit<'a, F, T>
where
    F: LinearCombination<T>,
{
    /// Prepares a fit of every parameter of `function`.
    ///
    /// # Errors
    /// Only fails for functions with no parameters ([`Error::NoFreeParameters`]).
    pub fn new(data: &'a DataSeries<T>, function: &'a mut F) -> Result<Self> {
        Self::with_mask(data, function, None)
    }

    /// Prepares a fit of the parameters selected by `mask`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if the mask length differs from the function's degrees of freedom.
    /// - [`Error::NoFreeParameters`] if the mask holds every parameter fixed.
    pub fn with_mask(
        data: &'a DataSeries<T>,
        function: &'a mut F,
        mask: Option<FitMask>,
    ) -> Result<Self> {
        let context = FitContext::new(data, function.degrees_of_freedom(), mask)?;
        log::debug!(
            "Linear fit of {}: {} of {} parameters free, {} points",
            function.name(),
            context.free_count(),
            context.total_parameters(),
            data.len()
        );

        Ok(Self {
            context,
            function,
            covariance: None,
        })
    }

    /// Solves the normal equations and stores the result in the function.
    ///
    /// # Errors
    /// - [`Error::SingularMatrix`] if the data does not determine every free parameter.
    /// - [`Error::NotInitialized`] if some parameters are fixed but the function has none set.
    pub fn fit(&mut self) -> Result<()> {
        let total = self.context.total_parameters();
        let free = self.context.free_indices();
        let n = free.len();

        // Fixed parameters need values to subtract; free ones are overwritten anyway
        let mut parameters = match self.function.parameters() {
            Ok(parameters) => parameters.to_vec(),
            Err(e) if self.context.has_fixed() => return Err(e),
            Err(_) => vec![T::zero(); total],
        };

        let mut alpha = Matrix::zeros(n, n);
        let mut beta = Matrix::zeros(n, 1);
        let mut basis = vec![T::zero(); total];

        for point in self.context.data() {
            for (j, value) in basis.iter_mut().enumerate() {
                *value = self.function.basis_function(point.x(), j)?;
            }

            let mut y = point.y();
            for j in (0..total).filter(|&j| !self.context.mask().is_free(j)) {
                y -= parameters[j] * basis[j];
            }

            let weight = point.weight();
            for (l, &row) in free.iter().enumerate() {
                let weighted = basis[row] * weight;
                for (m, &column) in free[..=l].iter().enumerate() {
                    alpha.set(l, m, alpha.get(l, m)? + weighted * basis[column])?;
                }
                beta.set(l, 0, beta.get(l, 0)? + y * weighted)?;
            }
        }

        // Only the lower triangle was accumulated
        for l in 1..n {
            for m in 0..l {
                alpha.set(m, l, alpha.get(l, m)?)?;
            }
        }

        GaussJordan::solve(&mut alpha, &mut beta)?;

        let solved: Vec<T> = (0..n).map(|l| beta.get(l, 0)).collect::<Result<_>>()?;
        self.context.scatter(&mut parameters, &solved)?;
        self.function.set_parameters(&parameters)?;

        log::debug!("Linear fit of {} solved: {}", self.function.name(), self.function);
        self.covariance = Some(alpha);
        Ok(())
    }

    /// Chi-squared of the function against the data at its current parameters.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] if the function has no parameters yet.
    pub fn chi_squared(&self) -> Result<T> {
        LeastSquares.calculate(self.context.data(), &*self.function)
    }

    /// Covariance of the free parameters, the inverse of the normal-equations matrix.
    ///
    /// `None` until [`LinearFit::fit`] has succeeded.
    #[must_use]
    pub fn covariance_matrix(&self) -> Option<&Matrix<T>> {
        self.covariance.as_ref()
    }

    /// Covariance expanded to every parameter; see [`FitContext::expand_covariance`].
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] before a successful fit.
    pub fn full_covariance_matrix(&self) -> Result<Matrix<T>> {
        let covariance = self
            .covariance
            .as_ref()
            .ok_or(Error::NotInitialized("LinearFit"))?;
        self.context.expand_covariance(covariance)
    }

    /// The shared fit state
    #[must_use]
    pub fn context(&self) -> &FitContext<'a, T> {
        &self.context
    }

    /// The function being fitted
    #[must_use]
    pub fn function(&self) -> &F {
        self.function
    }

    /// Summary of the fit.
    ///
    /// # Errors
    /// Returns [`Error::NotInitialized`] before a successful fit.
    pub fn report(&self) -> Result<FitReport<T>> {
        if self.covariance.is_none() {
            return Err(Error::NotInitialized("LinearFit"));
        }

        FitReport::new(
            &self.context,
            &*self.function,
            self.chi_squared()?,
            1,
            self.covariance.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_all_close, assert_close,
        function::{CustomBasis, LinearFunction, ParametricFunction, Polynomial},
    };

    #[test]
    fn test_exact_line() {
        let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
        let mut line = Polynomial::new(1);

        let mut fit = LinearFit::new(&data, &mut line).unwrap();
        fit.fit().unwrap();
        assert_close!(fit.chi_squared().unwrap(), 0.0, 1e-20);

        assert_all_close!(line.parameters().unwrap(), [1.0, 2.0], 1e-12);
    }

    #[test]
    fn test_constant_is_weighted_mean() {
        let data = DataSeries::from(vec![(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]);
        let mut constant = Polynomial::new(0);

        let mut fit = LinearFit::with_mask(&data, &mut constant, Some(FitMask::from([true]))).unwrap();
        fit.fit().unwrap();
        assert_close!(fit.chi_squared().unwrap(), 8.0, 1e-12);
        assert_close!(constant.parameters().unwrap()[0], 4.0, 1e-12);

        // Errors pull the mean toward the precise points
        let data = DataSeries::from(vec![(0.0, 1.0, 1.0), (1.0, 4.0, 0.5)]);
        let mut constant = Polynomial::new(0);
        LinearFit::new(&data, &mut constant).unwrap().fit().unwrap();

        // (1·1 + 4·4) / (1 + 4)
        assert_close!(constant.parameters().unwrap()[0], 3.4, 1e-12);
    }

    #[test]
    fn test_fixed_parameter() {
        // y = 10 + 3x, with the intercept held at 10
        let data = DataSeries::from(vec![(0.0, 10.0), (1.0, 13.0), (2.0, 16.0), (3.0, 19.0)]);
        let mut line = LinearFunction::with_parameters(10.0, 0.0);

        let mut fit = LinearFit::with_mask(&data, &mut line, Some(FitMask::from([false, true]))).unwrap();
        fit.fit().unwrap();

        let covariance = fit.full_covariance_matrix().unwrap();
        assert_eq!(covariance.get(0, 0).unwrap(), 1.0);
        assert_eq!(covariance.get(0, 1).unwrap(), 0.0);

        // 1 / Σx²
        assert_close!(covariance.get(1, 1).unwrap(), 1.0 / 14.0, 1e-12);
        assert_eq!(line.parameters().unwrap()[0], 10.0);
        assert_close!(line.parameters().unwrap()[1], 3.0, 1e-12);
    }

    #[test]
    fn test_fixed_parameter_needs_value() {
        let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 2.0)]);
        let mut line = Polynomial::new(1);
        let mut fit = LinearFit::with_mask(&data, &mut line, Some(FitMask::from([false, true]))).unwrap();
        assert!(matches!(fit.fit(), Err(Error::NotInitialized(_))));
    }

    #[test]
    fn test_mask_validation() {
        let data = DataSeries::from(vec![(0.0, 1.0)]);
        let mut line = Polynomial::new(1);

        let err = LinearFit::with_mask(&data, &mut line, Some(FitMask::from([false, false]))).unwrap_err();
        assert!(err.is_dimension_mismatch());

        let err = LinearFit::with_mask(&data, &mut line, Some(FitMask::from([true]))).unwrap_err();
        assert!(err.is_dimension_mismatch());
    }

    #[test]
    fn test_underdetermined_is_singular() {
        let data = DataSeries::from(vec![(1.0, 1.0), (1.0, 2.0)]);
        let mut line = Polynomial::new(1);
        let mut fit = LinearFit::new(&data, &mut line).unwrap();
        assert_eq!(fit.fit().unwrap_err(), Error::SingularMatrix);
    }

    #[test]
    fn test_custom_basis() {
        // y = 2·sin(x) - cos(x)
        let truth = |x: f64| 2.0 * x.sin() - x.cos();
        let data: DataSeries = (0..20).map(|i| f64::from(i) * 0.3).map(|x| (x, truth(x))).collect();

        let mut wave = CustomBasis::new("Wave", 2, |x: f64, i| if i == 0 { x.sin() } else { x.cos() });
        let mut fit = LinearFit::new(&data, &mut wave).unwrap();
        fit.fit().unwrap();

        let report = fit.report().unwrap();
        assert_eq!(report.data_points, 20);
        assert_eq!(report.free_parameters, 2);
        assert_all_close!(report.parameters, [2.0, -1.0], 1e-10);
    }

    #[test]
    fn test_report_before_fit() {
        let data = DataSeries::from(vec![(0.0, 1.0), (1.0, 2.0)]);
        let mut line = Polynomial::new(1);
        let fit = LinearFit::new(&data, &mut line).unwrap();
        assert!(fit.report().is_err());
        assert!(fit.covariance_matrix().is_none());
    }
}
