//! Error types for the iris predictor
//!
//! Library code returns these typed errors; the binary edge wraps them in
//! `anyhow` and the web layer maps them onto `AppError`.

use thiserror::Error;

/// Failures while loading a model artifact or running inference.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Model artifact could not be parsed: {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid model artifact: {message}")]
    Shape { message: String },

    #[error("Feature count mismatch: expected {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Non-finite value in {context}")]
    NonFinite { context: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a parse error
    pub fn parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    /// Create a shape error for an inconsistent artifact
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }
}

/// A submitted form value that cannot become a feature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("Missing field: {field}")]
    MissingField { field: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {message}")]
    Invalid { message: String },

    #[error(transparent)]
    Figment(#[from] figment::Error),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}
