//! Fitting one model from several starting points.
//!
//! Levenberg-Marquardt only finds the minimum nearest its start. When the starting
//! parameters are uncertain, [`multistart()`] fits an independent copy of the model from
//! each candidate and keeps the converged fit with the lowest chi-squared.
//!
//! With the `parallel` feature, the candidates are fitted on the rayon thread pool.
//! Each individual fit is still strictly sequential.
use crate::{
    data::DataSeries,
    error::{Error, Result},
    fitting::{FitMask, FitReport, LevenbergMarquardt, LevenbergMarquardtOptions},
    function::NonLinearCombination,
    value::Value,
};

/// A fitted copy of the model and its report
pub type Candidate<F, T> = (F, FitReport<T>);

/// Fits a copy of `model` from each parameter vector in `starts` and returns the
/// converged fit with the lowest chi-squared.
///
/// Candidates that fail to converge are discarded.
///
/// # Errors
/// - [`Error::DimensionMismatch`] if `starts` is empty, or a start has the wrong length.
/// - The first candidate's error if none of them converge.
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, fitting::{multistart, LevenbergMarquardtOptions}, function::GaussianFunction};
/// let truth = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
/// let data = DataSeries::sample_interval(&truth, 0.0..=4.0, 41).unwrap();
///
/// let starts = [vec![0.5, 4.0, 1.8, 1.2], vec![0.0, 3.0, 2.5, 0.8]];
/// let (_peak, report) = multistart(&data, &GaussianFunction::new(), &starts, None, LevenbergMarquardtOptions::default(), 1000).unwrap();
/// assert!(report.chi_squared < 1e-12);
/// ```
pub fn multistart<F, T>(
    data: &DataSeries<T>,
    model: &F,
    starts: &[Vec<T>],
    mask: Option<&FitMask>,
    options: LevenbergMarquardtOptions<T>,
    max_steps: usize,
) -> Result<Candidate<F, T>>
where
    F: NonLinearCombination<T> + Clone + Send + Sync,
    T: Value,
{
    if starts.is_empty() {
        return Err(Error::DimensionMismatch {
            context: "starting points",
            expected: 1,
            found: 0,
        });
    }

    let fit_from = |start: &Vec<T>| -> Result<Candidate<F, T>> {
        let mut function = model.clone();
        function.set_parameters(start)?;

        let mut fit = LevenbergMarquardt::with_mask(data, &mut function, mask.cloned())?.with_options(options);
        fit.fit(max_steps)?;
        let report = fit.report()?;
        Ok((function, report))
    };

    #[cfg(not(feature = "parallel"))]
    let candidates: Vec<_> = starts.iter().map(fit_from).collect();

    #[cfg(feature = "parallel")]
    let candidates: Vec<_> = {
        use rayon::prelude::*;
        starts.par_iter().map(fit_from).collect()
    };

    let mut first_error = None;
    let mut best: Option<Candidate<F, T>> = None;
    for (i, candidate) in candidates.into_iter().enumerate() {
        match candidate {
            Ok(candidate) => {
                log::debug!("Start {i}: χ² = {:e}", candidate.1.chi_squared);
                let better = match &best {
                    Some((_, report)) => candidate.1.chi_squared < report.chi_squared,
                    None => true,
                };
                if better {
                    best = Some(candidate);
                }
            }

            Err(e) => {
                log::debug!("Start {i} discarded: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    match (best, first_error) {
        (Some(best), _) => Ok(best),
        (None, Some(e)) => Err(e),
        (None, None) => Err(Error::NoData),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assert_all_close,
        function::{GaussianFunction, ParametricFunction},
    };

    fn data() -> DataSeries {
        let truth = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
        DataSeries::sample_interval(&truth, 0.0..=4.0, 41).unwrap()
    }

    #[test]
    fn test_best_start_wins() {
        let data = data();
        let starts = [
            // Already on the optimum, so this one never converges
            vec![0.0, 5.0, 2.0, 1.0],
            vec![0.5, 4.0, 1.8, 1.2],
            vec![0.0, 4.5, 2.2, 0.9],
        ];

        let (peak, report) = multistart(
            &data,
            &GaussianFunction::new(),
            &starts,
            None,
            LevenbergMarquardtOptions::default(),
            50,
        )
        .unwrap();

        assert!(report.chi_squared < 1e-10);
        assert_all_close!(peak.parameters().unwrap(), [0.0, 5.0, 2.0, 1.0], 1e-4);
    }

    #[test]
    fn test_mask_is_shared() {
        let data = data();
        let mask = FitMask::all_except(4, &[0]);
        let starts = [vec![0.0, 4.0, 1.8, 1.2]];

        let (peak, report) = multistart(
            &data,
            &GaussianFunction::new(),
            &starts,
            Some(&mask),
            LevenbergMarquardtOptions::default(),
            1000,
        )
        .unwrap();

        assert_eq!(report.free, vec![false, true, true, true]);
        assert_eq!(peak.parameters().unwrap()[0], 0.0);
    }

    #[test]
    fn test_all_starts_fail() {
        let data = data();
        let starts = [vec![0.0, 5.0, 2.0, 1.0]];

        let err = multistart(
            &data,
            &GaussianFunction::new(),
            &starts,
            None,
            LevenbergMarquardtOptions::default(),
            5,
        )
        .unwrap_err();
        assert_eq!(err, Error::ConvergenceFailure { steps: 5 });

        let err = multistart(
            &data,
            &GaussianFunction::new(),
            &[vec![1.0, 2.0]],
            None,
            LevenbergMarquardtOptions::default(),
            5,
        )
        .unwrap_err();
        assert!(err.is_dimension_mismatch());

        let err = multistart(
            &data,
            &GaussianFunction::new(),
            &[],
            None,
            LevenbergMarquardtOptions::default(),
            5,
        )
        .unwrap_err();
        assert!(err.is_dimension_mismatch());
    }
}
