//! Error types for the principles service
//!
//! Every failure the service can report is classified by an [`ErrorKind`].
//! The kind alone decides the HTTP status, so the mapping can be tested
//! without an HTTP stack.

use std::fmt;
use thiserror::Error;

/// Message returned when no store connection was established at startup
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Database connection not available.";

/// Message returned when a creation payload lacks a required field
pub const MISSING_FIELDS_MESSAGE: &str = "Missing 'title' or 'description' in request body.";

/// Message returned when an identifier cannot be parsed by the store
pub const INVALID_ID_MESSAGE: &str = "Invalid ID format.";

/// Message returned when no document matches an identifier
pub const NOT_FOUND_MESSAGE: &str = "Principle not found.";

/// Classification of service failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required configuration is missing or unusable
    Configuration,
    /// No store connection was established
    StoreUnavailable,
    /// The request was malformed or incomplete
    Validation,
    /// The requested document or resource does not exist
    NotFound,
    /// The store failed while executing an operation
    StoreOperation,
}

impl ErrorKind {
    /// HTTP status code for this kind of failure
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Configuration | ErrorKind::StoreUnavailable | ErrorKind::StoreOperation => {
                500
            }
        }
    }

    /// Whether the caller can fix the failure by changing the request
    pub fn is_client_error(self) -> bool {
        matches!(self, ErrorKind::Validation | ErrorKind::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::StoreUnavailable => write!(f, "store_unavailable"),
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::StoreOperation => write!(f, "store_operation"),
        }
    }
}

/// Errors reported by the principle service
///
/// The display text of each variant is the message shown to clients.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Missing or invalid configuration
    #[error("{0}")]
    Configuration(String),

    /// The store was never connected
    #[error("{}", STORE_UNAVAILABLE_MESSAGE)]
    StoreUnavailable,

    /// Malformed body, missing fields or malformed identifier
    #[error("{0}")]
    Validation(String),

    /// No document for the given identifier
    #[error("{0}")]
    NotFound(String),

    /// Any other failure raised by the store
    #[error("{0}")]
    StoreOperation(String),
}

impl ServiceError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        ServiceError::Configuration(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    /// The error's classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Configuration(_) => ErrorKind::Configuration,
            ServiceError::StoreUnavailable => ErrorKind::StoreUnavailable,
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::StoreOperation(_) => ErrorKind::StoreOperation,
        }
    }

    /// Shortcut for `self.kind().status_code()`
    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidId(_) => ServiceError::validation(INVALID_ID_MESSAGE),
            other => ServiceError::StoreOperation(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Validation(format!("Invalid JSON body: {}", err))
    }
}

/// Errors raised by document store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The external identifier does not match the native format
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// Could not reach or authenticate with the store
    #[error("Connection error: {0}")]
    Connection(String),

    /// A document could not be converted to or from the store format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store rejected or failed an operation
    #[error("{0}")]
    Operation(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Operation(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
