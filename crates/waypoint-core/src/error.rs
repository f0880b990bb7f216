//! Error types for the tracker library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Process not found for the given ID
    #[error("Process with ID {id} not found")]
    ProcessNotFound { id: u64 },
    /// Template not found for the given ID
    #[error("Template with ID {id} not found")]
    TemplateNotFound { id: u64 },
    /// Step not found within the given process
    #[error("Step '{step_id}' not found in process {process_id}")]
    StepNotFound { process_id: u64, step_id: String },
    /// The current status of a process or step forbids the action
    #[error("Cannot {action}: {reason}")]
    InvalidState { action: String, reason: String },
    /// Malformed input to a create or build operation
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification of a [`TrackerError`] for callers that only care
/// about how to react, not about the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A process, template or step id did not resolve
    NotFound,
    /// The action is not allowed in the current status
    InvalidState,
    /// The input was malformed
    Validation,
    /// Storage, file system or runtime failure
    Internal,
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> TrackerError {
        TrackerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct ValidationErrorBuilder {
    field: String,
}

impl ValidationErrorBuilder {
    /// Create a new validation error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> TrackerError {
        TrackerError::Validation {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl TrackerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn validation(field: impl Into<String>) -> ValidationErrorBuilder {
        ValidationErrorBuilder::new(field)
    }

    /// Creates an invalid state error for the named action.
    pub fn invalid_state(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidState {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ProcessNotFound { .. }
            | Self::TemplateNotFound { .. }
            | Self::StepNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Database { .. }
            | Self::FileSystem { .. }
            | Self::XdgDirectory(_)
            | Self::Serialization { .. }
            | Self::Configuration { .. } => ErrorKind::Internal,
        }
    }

    /// Returns true when the error was caused by the caller's request rather
    /// than by the environment.
    pub fn is_caller_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| TrackerError::database(message).with_source(e))
    }
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
