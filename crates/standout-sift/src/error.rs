//! Error types for the sift crate.

use thiserror::Error;

/// Errors that can occur when configuring filters or rendering highlights.
#[derive(Debug, Error)]
pub enum SiftError {
    /// The requested operation is not supported for this input.
    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    /// Filter mode name is not one of `some`, `every`, `union`, `intersection`.
    #[error("invalid filter mode '{0}' (expected some, every, union or intersection)")]
    InvalidFilterMode(String),

    /// JSON configuration could not be parsed.
    #[error("invalid JSON filter config: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("invalid YAML filter config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type for sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
