//! Request error taxonomy.
//!
//! `Display` is the user-facing message that ends up in the failed lifecycle state.

use thiserror::Error;

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The request did not complete, or the body could not be read.
    #[error("{0}")]
    Transport(String),
    /// Non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// 2xx, but the body is not JSON.
    #[error("{0}")]
    InvalidBody(String),
    /// The request task ended without reporting an outcome.
    #[error("request ended before a response was received")]
    Interrupted,
}

impl GenerateError {
    /// Transport failure from any error; an empty description becomes `Unknown error`.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        let description = err.to_string();
        if description.trim().is_empty() {
            GenerateError::Transport(UNKNOWN_ERROR.to_string())
        } else {
            GenerateError::Transport(description)
        }
    }
}
