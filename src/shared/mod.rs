//! Shared Module
//!
//! This module contains the types shared by the HTTP surface and the live
//! websocket protocol. Nothing in here depends on the server stack; every
//! type is plain serde data.

/// Rooms, messages, assignments and identities
pub mod chat;

/// Live chat wire protocol
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use chat::{
    ChatMessage, ChatRoom, ChatRoomAssignment, FieldId, Identity, LastMessagePreview,
    MessageDraft, MessageId, MessageKind, MessagePage, Role, RoomDetail, RoomId, RoomSummary,
    RoomType, UserId,
};
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::{ClientEvent, PresenceStatus, ServerEvent};
