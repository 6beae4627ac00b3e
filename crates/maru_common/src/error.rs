//! Error types for the routing pipeline.

use std::fmt;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Every way routing an instruction can fail short of a crash
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error("Unsupported operation: {0}")]
    UnknownOperation(String),

    #[error("Operation already registered: {0}")]
    DuplicateOperation(String),

    #[error("Operation {operation} declares parameter '{parameter}' twice")]
    DuplicateParameter { operation: String, parameter: String },

    #[error("Missing required argument '{parameter}'")]
    MissingArgument { parameter: String },

    #[error("Argument '{parameter}' must be a {expected}")]
    TypeMismatch { parameter: String, expected: String },

    #[error("Argument '{parameter}' has value {value}, expected one of: {allowed}")]
    InvalidEnumValue {
        parameter: String,
        value: String,
        allowed: String,
    },

    #[error("Argument '{parameter}' is not accepted by this operation")]
    UnexpectedArgument { parameter: String },

    #[error("Malformed arguments: {0}")]
    MalformedArguments(String),

    #[error("Reasoning service error: {0}")]
    DecisionService(#[from] LlmError),

    #[error("Operation {operation} failed: {message}")]
    OperationExecution { operation: String, message: String },
}

/// Stable classification of a [`DispatchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownOperation,
    DuplicateOperation,
    DuplicateParameter,
    MissingArgument,
    TypeMismatch,
    InvalidEnumValue,
    UnexpectedArgument,
    MalformedArguments,
    DecisionService,
    OperationExecution,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnknownOperation => "unknown_operation",
            ErrorKind::DuplicateOperation => "duplicate_operation",
            ErrorKind::DuplicateParameter => "duplicate_parameter",
            ErrorKind::MissingArgument => "missing_argument",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::InvalidEnumValue => "invalid_enum_value",
            ErrorKind::UnexpectedArgument => "unexpected_argument",
            ErrorKind::MalformedArguments => "malformed_arguments",
            ErrorKind::DecisionService => "decision_service",
            ErrorKind::OperationExecution => "operation_execution",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownOperation(_) => ErrorKind::UnknownOperation,
            DispatchError::DuplicateOperation(_) => ErrorKind::DuplicateOperation,
            DispatchError::DuplicateParameter { .. } => ErrorKind::DuplicateParameter,
            DispatchError::MissingArgument { .. } => ErrorKind::MissingArgument,
            DispatchError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DispatchError::InvalidEnumValue { .. } => ErrorKind::InvalidEnumValue,
            DispatchError::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            DispatchError::MalformedArguments(_) => ErrorKind::MalformedArguments,
            DispatchError::DecisionService(_) => ErrorKind::DecisionService,
            DispatchError::OperationExecution { .. } => ErrorKind::OperationExecution,
        }
    }

    /// Parameter the error is about, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            DispatchError::DuplicateParameter { parameter, .. }
            | DispatchError::MissingArgument { parameter }
            | DispatchError::TypeMismatch { parameter, .. }
            | DispatchError::InvalidEnumValue { parameter, .. }
            | DispatchError::UnexpectedArgument { parameter } => Some(parameter),
            _ => None,
        }
    }
}

/// Failure reported by an operation implementation.
///
/// The dispatcher wraps it into [`DispatchError::OperationExecution`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct OperationFailure(pub String);

impl OperationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Startup configuration errors. These are the only fatal ones.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingApiKey(&'static str),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
