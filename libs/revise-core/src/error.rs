//! Error types for revise-core.

use thiserror::Error;

/// Result type alias using BankError.
pub type Result<T> = std::result::Result<T, BankError>;

/// Errors that can occur while loading a question bank.
///
/// Grading and scheduling never fail; only structural problems with the bank
/// itself are reported here.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("invalid question bank JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("question bank must be an array or an object with a `questions` array")]
    UnexpectedShape,

    #[error("question at index {index} is not an object")]
    NotAnObject { index: usize },

    #[error("missing ID for question at index {index}")]
    MissingId { index: usize },

    #[error("duplicate ID {id} at index {index}")]
    DuplicateId { id: String, index: usize },
}
