//! Chat HTTP Handlers
//!
//! Thin wrappers over `ChatService`; every handler requires `AuthUser`.

/// Request and response bodies
pub mod types;

/// Room endpoints
pub mod rooms;

/// Message and unread endpoints
pub mod messages;

pub use messages::{list_messages, mark_read, send_message, unread_count};
pub use rooms::{assign_admin, close_room, create_room, get_room, list_assignments, list_rooms};
