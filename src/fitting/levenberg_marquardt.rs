use crate::{
    data::DataSeries,
    error::{Error, Result},
    fitting::{FitContext, FitMask, FitReport},
    function::NonLinearCombination,
    linalg::{GaussJordan, Matrix},
    value::Value,
};

/// Step budget used when the caller has no better estimate.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Tuning constants for [`LevenbergMarquardt`].
///
/// Missing fields fall back to their defaults when deserializing.
///
/// # Example
/// ```rust
/// # use lsqfit::fitting::LevenbergMarquardtOptions;
/// let options = LevenbergMarquardtOptions {
///     tolerance: 1e-12,
///     ..Default::default()
/// };
/// assert_eq!(options.initial_lambda, 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LevenbergMarquardtOptions<T: Value = f64> {
    /// Damping factor before the first step
    pub initial_lambda: T,

    /// Multiplier applied to lambda after an accepted step
    pub lambda_decrease: T,

    /// Multiplier applied to lambda after a rejected step
    pub lambda_increase: T,

    /// Lambda never grows past this value
    pub max_lambda: T,

    /// A positive chi-squared improvement below this ends the fit
    pub tolerance: T,
}
impl<T: Value> Default for LevenbergMarquardtOptions<T> {
    fn default() -> Self {
        Self {
            initial_lambda: T::constant(1e-3),
            lambda_decrease: T::constant(0.1),
            lambda_increase: T::constant(10.0),
            max_lambda: T::constant(1e100),
            tolerance: T::constant(1e-9),
        }
    }
}

/// Outcome of a single [`LevenbergMarquardt::iterate`] call.
///
/// Both variants carry the baseline chi-squared and the damping factor after the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<T: Value = f64> {
    /// The trial parameters lowered chi-squared and were kept
    Accepted {
        /// New baseline chi-squared
        chi_squared: T,
        /// Lambda after shrinking
        lambda: T,
    },

    /// The trial parameters did not improve chi-squared and were discarded
    Rejected {
        /// Unchanged baseline chi-squared
        chi_squared: T,
        /// Lambda after growing
        lambda: T,
    },
}
impl<T: Value> Step<T> {
    /// True for [`Step::Accepted`]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Where a [`LevenbergMarquardt`] engine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitStatus {
    /// Steps may still be taken
    #[default]
    Evaluating,

    /// The last [`LevenbergMarquardt::fit`] met its tolerance
    Converged {
        /// Steps taken by that call
        iterations: usize,
    },

    /// The last [`LevenbergMarquardt::fit`] ran out of steps
    Failed {
        /// The exhausted step budget
        steps: usize,
    },
}

/// Curvature matrix, gradient and chi-squared at one parameter vector.
#[derive(Debug, Clone)]
struct Curvature<T: Value> {
    alpha: Matrix<T>,
    beta: Matrix<T>,
    chi_squared: T,
}

/// Iterative least-squares fit of a function that is non-linear in its parameters.
///
/// Each [`LevenbergMarquardt::iterate`] solves the damped normal equations for a
/// parameter change, tries it, and keeps it only if chi-squared drops. Lambda shrinks
/// after a kept step (toward Gauss-Newton) and grows after a discarded one (toward
/// steepest descent).
///
/// The function's parameters must be set before construction; they are the starting
/// point, and fixed parameters keep those values.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// For each point i, with residual dy_i = y_i - f(x_i) and weight w_i = 1 / σ_i²:
///   α[l,m] += w_i·∂f/∂p_l·∂f/∂p_m
///   β[l]   += w_i·dy_i·∂f/∂p_l
///   χ²     += w_i·dy_i²
/// A step solves α'·δ = β, where α' is α with each diagonal entry scaled by (1 + λ),
/// and tries p + δ over the free parameters.
/// ```
/// </div>
///
/// # Example
/// ```rust
/// # use lsqfit::{data::DataSeries, fitting::{LevenbergMarquardt, DEFAULT_MAX_STEPS}, function::GaussianFunction};
/// let truth = GaussianFunction::with_parameters(0.0, 5.0, 2.0, 1.0);
/// let data = DataSeries::sample_interval(&truth, 0.0..=4.0, 41).unwrap();
///
/// let mut peak = GaussianFunction::with_parameters(0.5, 4.0, 1.8, 1.2);
/// let mut fit = LevenbergMarquardt::new(&data, &mut peak).unwrap();
/// let iterations = fit.fit(DEFAULT_MAX_STEPS).unwrap();
///
/// assert!(iterations < DEFAULT_MAX_STEPS);
/// assert!(fit.chi_squared() < 1e-12);
/// ```
#[derive(Debug)]
pub struct LevenbergMarquardt<'a, F, T: Value = f64>
where
    F: NonLinearCombination<T>,
{
    context: FitContext<'a, T>,
    function: &'a mut F,
    options: LevenbergMarquardtOptions<T>,
    parameters: Vec<T>,
    curvature: Curvature<T>,
    lambda: T,
    status: FitStatus,
    iterations: usize,
}
impl<'a, F, T: Value> LevenbergMarquardt<'a, F, T>
where
    F: NonLinearCombination<T>,
{
    /// Prepares a fit of every parameter of `function`.
    ///
    /// # Errors
    /// - [`Error::NotInitialized`] if the function has no starting parameters.
    /// - [`Error::NoFreeParameters`] for functions with no parameters.
    pub fn new(data: &'a DataSeries<T>, function: &'a mut F) -> Result<Self> {
        Self::with_mask(data, function, None)
    }

    /// Prepares a fit of the parameters selected by `mask`.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if the mask length differs from the function's degrees of freedom.
    /// - [`Error::NoFreeParameters`] if the mask holds every parameter fixed.
    /// - [`Error::NotInitialized`] if the function has no starting parameters.
    pub fn with_mask(
        data: &'a DataSeries<T>,
        function: &'a mut F,
        mask: Option<FitMask>,
    ) -> Result<Self> {
        let context = FitContext::new(data, function.degrees_of_freedom(), mask)?;
        let parameters = function.parameters()?.to_vec();
        let curvature = Self::curvature_at(&context, &*function)?;

        log::debug!(
            "Levenberg-Marquardt fit of {}: {} of {} parameters free, {} points, initial χ² = {:e}",
            function.name(),
            context.free_count(),
            context.total_parameters(),
            data.len(),
            curvature.chi_squared
        );

        let options = LevenbergMarquardtOptions::default();
        Ok(Self {
            context,
            function,
            lambda: options.initial_lambda,
            options,
            parameters,
            curvature,
            status: FitStatus::Evaluating,
            iterations: 0,
        })
    }

    /// Replaces the tuning constants and resets lambda to the new initial value.
    #[must_use]
    pub fn with_options(mut self, options: LevenbergMarquardtOptions<T>) -> Self {
        self.lambda = options.initial_lambda;
        self.options = options;
        self
    }

    /// Accumulates the curvature matrix, gradient and chi-squared at the function's
    /// current parameters, over the free parameters only.
    fn curvature_at(context: &FitContext<'_, T>, function: &F) -> Result<Curvature<T>> {
        let free = context.free_indices();
        let n = free.len();

        let mut alpha = Matrix::zeros(n, n);
        let mut beta = Matrix::zeros(n, 1);
        let mut chi_squared = T::zero();
        let mut derivatives = vec![T::zero(); n];

        for point in context.data() {
            let x = point.x();
            for (derivative, &index) in derivatives.iter_mut().zip(free) {
                *derivative = function.partial_derivative(x, index)?;
            }

            let weight = point.weight();
            let dy = point.y() - function.y(x)?;
            for l in 0..n {
                let weighted = derivatives[l] * weight;
                for m in 0..=l {
                    alpha.set(l, m, alpha.get(l, m)? + weighted * derivatives[m])?;
                }
                beta.set(l, 0, beta.get(l, 0)? + dy * weighted)?;
            }
            chi_squared += dy * dy * weight;
        }

        for l in 1..n {
            for m in 0..l {
                alpha.set(m, l, alpha.get(l, m)?)?;
            }
        }

        Ok(Curvature {
            alpha,
            beta,
            chi_squared,
        })
    }

    /// Attempts one damped step from the current parameters.
    ///
    /// On acceptance the function keeps the trial parameters; on rejection its previous
    /// parameters are restored. Either way the engine stays usable.
    ///
    /// # Errors
    /// - [`Error::SingularMatrix`] if the damped curvature matrix cannot be solved.
    /// - Any error from evaluating the function; its parameters are restored first.
    pub fn iterate(&mut self) -> Result<Step<T>> {
        let mut covar = self.curvature.alpha.clone();
        let damping = T::one() + self.lambda;
        for j in 0..covar.rows() {
            covar.set(j, j, covar.get(j, j)? * damping)?;
        }

        let mut delta = self.curvature.beta.clone();
        GaussJordan::solve(&mut covar, &mut delta)?;

        let mut trial = self.parameters.clone();
        for (k, &index) in self.context.free_indices().iter().enumerate() {
            trial[index] += delta.get(k, 0)?;
        }

        self.function.set_parameters(&trial)?;
        let curvature = match Self::curvature_at(&self.context, &*self.function) {
            Ok(curvature) => curvature,
            Err(e) => {
                self.function.set_parameters(&self.parameters)?;
                return Err(e);
            }
        };
        self.iterations += 1;

        let step = if curvature.chi_squared < self.curvature.chi_squared {
            self.lambda *= self.options.lambda_decrease;
            self.curvature = curvature;
            self.parameters = trial;
            Step::Accepted {
                chi_squared: self.curvature.chi_squared,
                lambda: self.lambda,
            }
        } else {
            let grown = self.lambda * self.options.lambda_increase;
            self.lambda = if grown > self.options.max_lambda {
                self.options.max_lambda
            } else {
                grown
            };
            self.function.set_parameters(&self.parameters)?;
            Step::Rejected {
                chi_squared: self.curvature.chi_squared,
                lambda: self.lambda,
            }
        };

        log::trace!("Step {}: {step:?}", self.iterations);
        Ok(step)
    }

    /// Iterates until chi-squared improves by a positive amount below the tolerance.
    ///
    /// Returns the number of steps taken by this call.
    ///
    /// # Errors
    /// - [`Error::ConvergenceFailure`] if `max_steps` steps pass without convergence.
    ///   The function keeps the best parameters found.
    /// - Any error raised by [`LevenbergMarquardt::iterate`].
    pub fn fit(&mut self, max_steps: usize) -> Result<usize> {
        self.status = FitStatus::Evaluating;

        for step in 0..max_steps {
            let previous = self.curvature.chi_squared;
            self.iterate()?;

            let improvement = previous - self.curvature.chi_squared;
            if improvement > T::zero() && improvement < self.options.tolerance {
                let iterations = step + 1;
                self.status = FitStatus::Converged { iterations };
                log::debug!(
                    "Levenberg-Marquardt fit of {} converged after {iterations} steps: χ² = {:e}",
                    self.function.name(),
                    self.curvature.chi_squared
                );
                return Ok(iterations);
            }
        }

        self.status = FitStatus::Failed { steps: max_steps };
        log::warn!(
            "Levenberg-Marquardt fit of {} did not converge in {max_steps} steps (χ² = {:e}, λ = {:e})",
            self.function.name(),
            self.curvature.chi_squared,
            self.lambda
        );
        Err(Error::ConvergenceFailure { steps: max_steps })
    }

    /// Chi-squared at the current parameters
    #[must_use]
    pub fn chi_squared(&self) -> T {
        self.curvature.chi_squared
    }

    /// Current damping factor
    #[must_use]
    pub fn lambda(&self) -> T {
        self.lambda
    }

    /// Outcome of the last [`LevenbergMarquardt::fit`]
    #[must_use]
    pub fn status(&self) -> FitStatus {
        self.status
    }

    /// Steps taken since construction, across every call
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Current parameter vector, fixed parameters included
    #[must_use]
    pub fn parameters(&self) -> &[T] {
        &self.parameters
    }

    /// Undamped curvature matrix over the free parameters
    #[must_use]
    pub fn curvature_matrix(&self) -> &Matrix<T> {
        &self.curvature.alpha
    }

    /// Covariance of the free parameters, the inverse of the curvature matrix.
    ///
    /// # Errors
    /// Returns [`Error::SingularMatrix`] if the curvature matrix has no inverse.
    pub fn covariance_matrix(&self) -> Result<Matrix<T>> {
        self.curvature.alpha.inverse()
    }

    /// Covariance expanded to every parameter; see [`FitContext::expand_covariance`].
    ///
    /// # Errors
    /// Returns [`Error::SingularMatrix`] if the curvature matrix has no inverse.
    pub fn full_covariance_matrix(&self) -> Result<Matrix<T>> {
        self.context.expand_covariance(&self.covariance_matrix()?)
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

    /// Summary of the fit at the current parameters.
    ///
    /// Standard errors are omitted if the curvature matrix is singular.
    ///
    /// # Errors
    /// Returns an error if the function's parameters cannot be read.
    pub fn report(&self) -> Result<FitReport<T>> {
        let covariance = self.covariance_matrix().ok();
        FitReport::new(
            &self.context,
            &*self.function,
            self.curvature.chi_squared,
            self.iterations,
            covariance.as_ref(),
        )
    }
}
