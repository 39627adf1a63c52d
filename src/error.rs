use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArborError {
    /// Malformed input at the boundary of an operation
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced identity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is illegal in the current state
    #[error("Invalid state: {0}")]
    State(String),
}

pub type Result<T> = std::result::Result<T, ArborError>;
