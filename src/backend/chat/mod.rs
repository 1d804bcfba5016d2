//! Chat Backend Module
//!
//! Server-side support chat: who may use a room, how rooms and messages are
//! stored, unread counts, and the HTTP endpoints.
//!
//! # Module Structure
//!
//! ```text
//! chat/
//! ├── mod.rs          - Module exports and documentation
//! ├── access.rs       - Room access rule
//! ├── rooms.rs        - Room lifecycle persistence
//! ├── messages.rs     - Message store, read flags, pagination
//! ├── unread.rs       - Unread counts
//! ├── service.rs      - ChatService facade used by HTTP and websocket
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldchat::backend::chat::ChatService;
//! use fieldchat::shared::{Identity, MessageDraft};
//!
//! # async fn example(chat: ChatService, me: Identity) -> Result<(), Box<dyn std::error::Error>> {
//! let (room, _created) = chat.find_or_create_room(&me, None, Default::default()).await?;
//! chat.post_message(&me, room.id, MessageDraft::text("Is pitch 2 free tonight?")).await?;
//! # Ok(())
//! # }
//! ```

/// Room access rule
pub mod access;

/// Room persistence
pub mod rooms;

/// Message persistence and read tracking
pub mod messages;

/// Unread counts
pub mod unread;

/// Chat operations facade
pub mod service;

/// HTTP handlers
pub mod handlers;

pub use access::can_access_room;
pub use messages::{PageLimits, PageQuery, Pagination};
pub use service::ChatService;
