//! Error types for jsql.

use thiserror::Error;

/// The main error type for jsql operations.
#[derive(Debug, Error)]
pub enum JsqlError {
    /// An operand has the wrong shape for its operator.
    #[error("Validation error in '{operator}': {message}")]
    Validation { operator: String, message: String },

    /// The key resolves neither in the dialect nor in its base.
    #[error("Unknown operator: '{0}'")]
    UnknownOperator(String),

    /// A mandatory template reference has no value.
    #[error("Missing required field '{field}' in '{operator}'")]
    MissingRequiredField { field: String, operator: String },

    /// A grammar string could not be parsed.
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    /// No dialect is registered under this name.
    #[error("Unknown dialect: '{0}'. Expected: ansi, mysql or postgresql")]
    UnknownDialect(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON input error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsqlError {
    /// Create a validation error for an operator.
    pub fn validation(operator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            operator: operator.into(),
            message: message.into(),
        }
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            operator: operator.into(),
        }
    }

    /// Create a grammar syntax error at the given position.
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }
}

/// Result type alias for jsql operations.
pub type JsqlResult<T> = Result<T, JsqlError>;
