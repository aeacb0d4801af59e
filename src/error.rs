// src/error.rs

//! Unified error handling for the preprocessor.

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for preprocessor operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request to the annotation service failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Key-value store command failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// An archive line is not a valid post record
    #[error("Malformed record at {}:{line}: {source}", path.display())]
    Decode {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    /// A field the pipeline reads is absent on a surviving post
    #[error("Post is missing field '{field}'")]
    MissingField { field: &'static str },

    /// `created_at` does not match the archive timestamp format
    #[error("Invalid timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },

    /// `id_str` is not a base-10 integer
    #[error("Invalid post id '{value}': {source}")]
    PostId {
        value: String,
        source: ParseIntError,
    },

    /// Annotator returned a different number of documents than it was given
    #[error("Annotator returned {actual} documents for a batch of {expected}")]
    AnnotationMismatch { expected: usize, actual: usize },

    /// Annotation service reported a failure
    #[error("Annotator error: {0}")]
    Annotator(String),

    /// In-process queue receiver was dropped
    #[error("Queue channel closed: {0}")]
    ChannelClosed(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an annotator error.
    pub fn annotator(message: impl fmt::Display) -> Self {
        Self::Annotator(message.to_string())
    }

    /// Whether the error concerns a single post rather than the whole archive.
    pub fn is_per_post(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. } | Self::Timestamp { .. } | Self::PostId { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_post_errors_are_classified() {
        assert!(AppError::MissingField { field: "id_str" }.is_per_post());
        let source = "x1".parse::<u64>().unwrap_err();
        assert!(
            AppError::PostId {
                value: "x1".into(),
                source
            }
            .is_per_post()
        );
        assert!(
            !AppError::AnnotationMismatch {
                expected: 2,
                actual: 1
            }
            .is_per_post()
        );
        assert!(!AppError::config("bad").is_per_post());
    }

    #[test]
    fn mismatch_message_names_both_counts() {
        let err = AppError::AnnotationMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Annotator returned 2 documents for a batch of 3"
        );
    }
}
