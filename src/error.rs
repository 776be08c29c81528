//! Error types with actionable diagnostics.
//!
//! Every error carries enough context for the caller to fix the input
//! without consulting external documentation.

use thiserror::Error;

/// Result type alias for adversario operations.
pub type Result<T> = std::result::Result<T, AdversarioError>;

/// Errors raised by the split and training-step components.
#[derive(Error, Debug)]
pub enum AdversarioError {
    /// A caller-supplied argument is outside its contract. Retrying without
    /// correcting the input will fail again.
    #[error("invalid argument `{arg}`: {message}")]
    InvalidArgument { arg: &'static str, message: String },

    /// A batch buffer does not line up with the model's instance size.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}\n  → check that the batch is a flat multiple of the model's instance size")]
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },
}

impl AdversarioError {
    /// Create an `InvalidArgument` error.
    pub fn invalid_argument(arg: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument { arg, message: message.into() }
    }
}
