//! Error types for least-squares fitting
//!
//! This module defines the failure modes of the matrix primitives, the Gauss-Jordan
//! solver and both fitting engines, along with a convenient `Result` alias.

/// Errors that can occur while building, solving or fitting.
///
/// Matrix and solver errors are raised immediately; the matrices involved are left
/// in an unspecified state and should be discarded by the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Two sizes that must agree do not.
    ///
    /// Raised for parameter vectors of the wrong length, fit-masks that do not match
    /// a function's degrees of freedom, and matrices with incompatible shapes.
    #[error("Dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being checked
        context: &'static str,
        /// The size the operation requires
        expected: usize,
        /// The size that was supplied
        found: usize,
    },

    /// The fit-mask marks every parameter as fixed.
    #[error("At least one parameter must be fit")]
    NoFreeParameters,

    /// A matrix, vector or parameter index lies outside its extent.
    #[error("{axis} index {index} is out of bounds (length {len})")]
    IndexOutOfBounds {
        /// The kind of index (`row`, `column`, `element`, `parameter`)
        axis: &'static str,
        /// The requested index
        index: usize,
        /// The extent along that axis
        len: usize,
    },

    /// Gauss-Jordan elimination found no usable pivot.
    ///
    /// Usually the data does not constrain every free parameter, or two basis
    /// functions are linearly dependent over the supplied x-values.
    #[error("Matrix is singular; no usable pivot remains")]
    SingularMatrix,

    /// A function was evaluated before its parameters were set.
    #[error("{0} was used before its parameters were set")]
    NotInitialized(&'static str),

    /// Levenberg-Marquardt ran out of steps before meeting its tolerance.
    #[error("Convergence not reached after {steps} steps")]
    ConvergenceFailure {
        /// The step budget that was exhausted
        steps: usize,
    },

    /// A matrix row was scaled by zero.
    #[error("Unable to multiply a matrix row by zero")]
    DivisionByZero,

    /// A raw data row did not contain 2 or 3 values.
    #[error("Data row {index} has {len} values; expected 2 or 3")]
    InvalidDataPoint {
        /// Position of the row in the input
        index: usize,
        /// Number of values found in the row
        len: usize,
    },

    /// Two points of a series share an x-value where distinct ones are required.
    #[error("Duplicate x-value at point {index}")]
    DuplicateX {
        /// Position of the second occurrence
        index: usize,
    },

    /// An operation that needs data received an empty series.
    #[error("No data available")]
    NoData,

    /// A noise distribution could not be built from the given parameters.
    #[error("Invalid noise distribution: {0}")]
    InvalidDistribution(String),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,
}

impl Error {
    /// Returns true for errors caused by disagreeing sizes.
    ///
    /// An all-`false` fit-mask counts: it asks to fit a zero-dimensional sub-space.
    #[must_use]
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. } | Self::NoFreeParameters)
    }
}

/// Result type for fitting operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_class() {
        assert!(Error::NoFreeParameters.is_dimension_mismatch());
        assert!(Error::DimensionMismatch {
            context: "test",
            expected: 2,
            found: 3
        }
        .is_dimension_mismatch());
        assert!(!Error::SingularMatrix.is_dimension_mismatch());
    }

    #[test]
    fn test_messages() {
        let err = Error::IndexOutOfBounds {
            axis: "row",
            index: 4,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "row index 4 is out of bounds (length 3)"
        );
        assert_eq!(
            Error::ConvergenceFailure { steps: 10 }.to_string(),
            "Convergence not reached after 10 steps"
        );
    }
}
