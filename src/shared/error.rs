//! Shared Error Types
//!
//! This module defines error types that are shared between the HTTP surface
//! and the live chat protocol.
//!
//! # Error Categories
//!
//! - `SerializationError` - JSON serialization failures on our side
//! - `ValidationError` - A field carries a value we cannot accept
//! - `MalformedInput` - An inbound payload could not be understood at all
//!
//! # Usage
//!
//! ```rust
//! use fieldchat::shared::error::SharedError;
//!
//! let error = SharedError::validation("room_type", "unknown room type 'x'");
//! ```
use thiserror::Error;

/// Shared error types that can occur on either surface
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON serialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Unparsable or unrecognized inbound payload
    #[error("{message}")]
    MalformedInput {
        /// Human-readable error message, shown to the client
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed-input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}
