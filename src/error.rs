//! Error types for qir.

use thiserror::Error;

/// The main error type for building, rendering and compiling statements.
#[derive(Debug, Error)]
pub enum QirError {
    /// Mutually exclusive builder calls.
    #[error("{0}")]
    Build(String),

    /// A statement lacks a clause the renderer or target needs.
    #[error("{0}")]
    MissingClause(String),

    /// A construct the active target cannot express.
    #[error("{message}")]
    Unsupported {
        target: &'static str,
        message: String,
    },

    /// Malformed input value (function in value position, bad DATEADD arguments, ...).
    #[error("{0}")]
    InvalidValue(String),

    /// Unknown `type` discriminator in a serialized payload.
    #[error("Unknown {kind} type: {name}")]
    UnknownType { kind: &'static str, name: String },

    /// A whole serialized payload could not be read back.
    #[error("Error parsing query: {0}")]
    Deserialize(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QirError {
    /// Create a build-time misuse error.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build(message.into())
    }

    /// Create a missing clause error.
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingClause(message.into())
    }

    /// Create an unsupported-feature error for the given target.
    pub fn unsupported(target: &'static str, message: impl Into<String>) -> Self {
        Self::Unsupported {
            target,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }

    pub fn unknown_type(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownType {
            kind,
            name: name.into(),
        }
    }

    /// The error raised when a function call is placed where a literal is expected.
    pub fn function_as_value() -> Self {
        Self::InvalidValue("FunctionExpression cannot be used as a value".to_string())
    }
}

/// Result type alias for qir operations.
pub type QirResult<T> = Result<T, QirError>;
