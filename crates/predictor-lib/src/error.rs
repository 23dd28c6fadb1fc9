//! Error taxonomy for the prediction path
//!
//! Every error raised below the request facade is one of these variants;
//! the facade converts them into the `{"error": ...}` response body. None
//! of them is fatal to the process.

use thiserror::Error;

/// Errors surfaced while handling a prediction request
#[derive(Error, Debug)]
pub enum PredictError {
    /// Request payload failed validation before reaching the pipeline
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Feature transform rejected the shaped input
    #[error("Preprocessing failed: {0}")]
    Preprocessing(String),

    /// A classifier invocation failed
    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),
}

/// Result type alias using our error
pub type Result<T> = std::result::Result<T, PredictError>;
