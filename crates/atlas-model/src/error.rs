use thiserror::Error;

/// Errors produced by model construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A required argument was null, empty, or of the wrong kind.
    /// Raised at the factory boundary; nothing is partially constructed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
