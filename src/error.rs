//! Error types for optimum-path forest operations.
//!
//! Every fallible operation in the crate reports through [`OpfError`];
//! nothing is retried internally because training is deterministic.

use std::fmt;

/// Main error type for OPF operations.
///
/// # Examples
///
/// ```
/// use opforest::error::OpfError;
///
/// let err = OpfError::DegenerateInput {
///     reason: "only one class present".to_string(),
/// };
/// assert!(err.to_string().contains("Degenerate input"));
/// ```
#[derive(Debug)]
pub enum OpfError {
    /// Training data cannot produce a forest (empty, single class, length mismatch).
    DegenerateInput {
        /// What made the input unusable
        reason: String,
    },

    /// Priority-queue contract violation. Indicates a defect in the caller.
    InvalidState {
        /// Description of the violated contract
        message: String,
    },

    /// `predict` (or a similar read) was called before a successful `fit`.
    NotFitted,

    /// Feature widths or sample counts don't line up.
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// Invalid configuration value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error while saving or loading a model.
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),
}

impl fmt::Display for OpfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpfError::DegenerateInput { reason } => write!(f, "Degenerate input: {reason}"),
            OpfError::InvalidState { message } => {
                write!(f, "Invalid priority queue state: {message}")
            }
            OpfError::NotFitted => write!(f, "Model not fitted: call fit() first"),
            OpfError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            OpfError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            OpfError::Io(e) => write!(f, "I/O error: {e}"),
            OpfError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for OpfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpfError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OpfError {
    fn from(err: std::io::Error) -> Self {
        OpfError::Io(err)
    }
}

impl From<bincode::Error> for OpfError {
    fn from(err: bincode::Error) -> Self {
        OpfError::Serialization(err.to_string())
    }
}

impl OpfError {
    /// Create a degenerate input error
    #[must_use]
    pub fn degenerate(reason: &str) -> Self {
        Self::DegenerateInput {
            reason: reason.to_string(),
        }
    }

    /// Create an invalid queue state error
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, OpfError>;
