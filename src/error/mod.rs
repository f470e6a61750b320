//! Error types for the request filters

use serde::{Deserialize, Serialize};
use std::backtrace::Backtrace;
use thiserror::Error;

/// Result type alias for security checker operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Main error type for the security checker
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bad request: {0}")]
    BadRequest(#[from] BadRequestError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Classification carried in the serialized error record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Provider configuration is malformed (construction time)
    ValidationError,
    /// A single request violates a filter precondition (request time)
    BadRequestError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::BadRequestError => "BadRequestError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized shape: `{ "error": { "name", "message", "stacktrace" } }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub name: ErrorKind,
    pub message: String,
    pub stacktrace: String,
}

/// Construction-time configuration failure
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
    trace: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Backtrace::capture().to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationError
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// HTTP status when a configuration failure surfaces to a client
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Structured record for the pipeline's error renderer
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            error: ErrorDetail {
                name: self.kind(),
                message: self.message.clone(),
                stacktrace: self.trace.clone(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_record())
    }
}

/// Request-time rejection raised by a filter
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct BadRequestError {
    message: String,
    trace: String,
}

impl BadRequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: Backtrace::capture().to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::BadRequestError
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// HTTP status a rejection translates to
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Structured record for the pipeline's error renderer
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            error: ErrorDetail {
                name: self.kind(),
                message: self.message.clone(),
                stacktrace: self.trace.clone(),
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.to_record())
    }
}

impl From<config::ConfigError> for FilterError {
    fn from(err: config::ConfigError) -> Self {
        FilterError::Config(err.to_string())
    }
}
