/**
 * Backend Error Types
 *
 * This module defines the error taxonomy of the chat backend.
 *
 * # Error Categories
 *
 * - `NotFound` - a room, admin or field does not exist
 * - `PermissionDenied` - authenticated but not allowed (never folded into `NotFound`)
 * - `Validation` - a required field is missing or unacceptable
 * - `MalformedInput` - an inbound payload could not be parsed
 * - `Unauthorized` - no usable identity
 * - `Database` - the store failed
 *
 * Every error is scoped to one request or one live connection.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Kind of failure, independent of transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Validation,
    MalformedInput,
    Unauthorized,
    Internal,
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use fieldchat::backend::error::BackendError;
///
/// let err = BackendError::not_found("Chat room not found");
/// let err = BackendError::permission_denied("Access denied");
/// let err = BackendError::validation("admin_id", "admin_id is required");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("Validation error in field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Store failure. The underlying error is logged, never shown to clients.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Transport-independent kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::MalformedInput { .. } => ErrorKind::MalformedInput,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::Shared(err) => match err {
                SharedError::ValidationError { .. } => ErrorKind::Validation,
                SharedError::MalformedInput { .. } => ErrorKind::MalformedInput,
                SharedError::SerializationError { .. } => ErrorKind::Internal,
            },
            Self::Database(_) | Self::Serialization(_) => ErrorKind::Internal,
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `NotFound` - 404
    /// - `PermissionDenied` - 403
    /// - `Validation`, `MalformedInput` - 400
    /// - `Unauthorized` - 401
    /// - everything else - 500
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::Validation | ErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal failures are not described.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound { message }
            | Self::PermissionDenied { message }
            | Self::MalformedInput { message }
            | Self::Unauthorized { message } => message.clone(),
            Self::Validation { message, .. } => message.clone(),
            Self::Shared(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::Shared(SharedError::MalformedInput { message }) => message.clone(),
            Self::Shared(SharedError::SerializationError { .. })
            | Self::Database(_)
            | Self::Serialization(_) => "Internal server error".to_string(),
        }
    }
}
