use crate::{
    data::DataSeries,
    error::{Error, Result},
    linalg::Matrix,
    value::Value,
};

/// Selects which parameters a fit may change.
///
/// `true` marks a parameter as free, `false` holds it at its current value.
///
/// # Example
/// ```rust
/// # use lsqfit::fitting::FitMask;
/// let mask = FitMask::from(vec![true, false, true]);
/// assert_eq!(mask.free_count(), 2);
/// assert_eq!(mask.free_indices().collect::<Vec<_>>(), vec![0, 2]);
///
/// let mask = FitMask::all_except(4, &[1]);
/// assert!(!mask.is_free(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FitMask(Vec<bool>);
impl FitMask {
    /// Every one of `n` parameters is free.
    #[must_use]
    pub fn all(n: usize) -> Self {
        Self(vec![true; n])
    }

    /// Every one of `n` parameters is free except those listed.
    ///
    /// Indices beyond `n` are ignored.
    #[must_use]
    pub fn all_except(n: usize, fixed: &[usize]) -> Self {
        let mut mask = vec![true; n];
        for &index in fixed.iter().filter(|&&i| i < n) {
            mask[index] = false;
        }
        Self(mask)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the mask has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if parameter `index` is free. Out-of-range indices are not free.
    #[must_use]
    pub fn is_free(&self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }

    /// Number of free parameters
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.0.iter().filter(|&&free| free).count()
    }

    /// Indices of the free parameters, ascending
    pub fn free_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &free)| free.then_some(i))
    }

    /// The raw flags
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for FitMask {
    fn from(mask: Vec<bool>) -> Self {
        Self(mask)
    }
}

impl From<&[bool]> for FitMask {
    fn from(mask: &[bool]) -> Self {
        Self(mask.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for FitMask {
    fn from(mask: [bool; N]) -> Self {
        Self(mask.to_vec())
    }
}

/// State shared by both fitting strategies: the data, the validated fit-mask, and the
/// positions of the free parameters.
///
/// Matrices built over the free parameters are indexed `0..free_count()`; entry `k`
/// corresponds to parameter `free_indices()[k]`.
#[derive(Debug, Clone)]
pub struct FitContext<'a, T: Value = f64> {
    data: &'a DataSeries<T>,
    mask: FitMask,
    free: Vec<usize>,
}
impl<'a, T: Value> FitContext<'a, T> {
    /// Validates `mask` against a function with `degrees_of_freedom` parameters.
    ///
    /// `None` frees every parameter.
    ///
    /// # Errors
    /// - [`Error::DimensionMismatch`] if the mask length differs from `degrees_of_freedom`.
    /// - [`Error::NoFreeParameters`] if the mask holds every parameter fixed.
    pub fn new(
        data: &'a DataSeries<T>,
        degrees_of_freedom: usize,
        mask: Option<FitMask>,
    ) -> Result<Self> {
        let mask = mask.unwrap_or_else(|| FitMask::all(degrees_of_freedom));
        if mask.len() != degrees_of_freedom {
            return Err(Error::DimensionMismatch {
                context: "fit mask",
                expected: degrees_of_freedom,
                found: mask.len(),
            });
        }

        let free: Vec<_> = mask.free_indices().collect();
        if free.is_empty() {
            return Err(Error::NoFreeParameters);
        }

        Ok(Self { data, mask, free })
    }

    /// The data being fitted
    #[must_use]
    pub fn data(&self) -> &'a DataSeries<T> {
        self.data
    }

    /// The validated fit-mask
    #[must_use]
    pub fn mask(&self) -> &FitMask {
        &self.mask
    }

    /// Indices of the free parameters in the full parameter vector
    #[must_use]
    pub fn free_indices(&self) -> &[usize] {
        &self.free
    }

    /// Number of free parameters
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of parameters in the full parameter vector
    #[must_use]
    pub fn total_parameters(&self) -> usize {
        self.mask.len()
    }

    /// True if at least one parameter is held fixed
    #[must_use]
    pub fn has_fixed(&self) -> bool {
        self.free.len() < self.mask.len()
    }

    /// Writes `values[k]` into `parameters[free_indices()[k]]`.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if either slice has the wrong length.
    pub fn scatter(&self, parameters: &mut [T], values: &[T]) -> Result<()> {
        if parameters.len() != self.total_parameters() {
            return Err(Error::DimensionMismatch {
                context: "full parameter vector",
                expected: self.total_parameters(),
                found: parameters.len(),
            });
        }
        if values.len() != self.free_count() {
            return Err(Error::DimensionMismatch {
                context: "free parameter values",
                expected: self.free_count(),
                found: values.len(),
            });
        }

        for (&index, &value) in self.free.iter().zip(values) {
            parameters[index] = value;
        }
        Ok(())
    }

    /// Expands a covariance matrix over the free parameters to the full parameter space.
    ///
    /// Free entries are copied to their parameter positions. Fixed parameters get unit
    /// variance on the diagonal and zero covariance with everything else.
    ///
    /// # Errors
    /// Returns [`Error::DimensionMismatch`] if `covariance` is not `free_count() × free_count()`.
    ///
    /// # Example
    /// ```rust
    /// # use lsqfit::{data::DataSeries, fitting::{FitContext, FitMask}, linalg::Matrix};
    /// let data = DataSeries::<f64>::default();
    /// let context = FitContext::new(&data, 3, Some(FitMask::from([true, false, true]))).unwrap();
    ///
    /// let free = Matrix::from_rows(&[[4.0, 0.5], [0.5, 9.0]]).unwrap();
    /// let full = context.expand_covariance(&free).unwrap();
    /// assert_eq!(full.to_rows(), vec![
    ///     vec![4.0, 0.0, 0.5],
    ///     vec![0.0, 1.0, 0.0],
    ///     vec![0.5, 0.0, 9.0],
    /// ]);
    /// ```
    pub fn expand_covariance(&self, covariance: &Matrix<T>) -> Result<Matrix<T>> {
        let n = self.free_count();
        if covariance.shape() != (n, n) {
            return Err(Error::DimensionMismatch {
                context: "free-parameter covariance",
                expected: n,
                found: covariance.rows(),
            });
        }

        let total = self.total_parameters();
        let mut full = Matrix::zeros(total, total);
        for index in (0..total).filter(|&i| !self.mask.is_free(i)) {
            full.set(index, index, T::one())?;
        }

        for (l, &row) in self.free.iter().enumerate() {
            for (m, &column) in self.free.iter().enumerate() {
                full.set(row, column, covariance.get(l, m)?)?;
            }
        }

        Ok(full)
    }
}
