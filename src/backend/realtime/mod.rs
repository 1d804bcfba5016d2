//! Real-time Chat Module
//!
//! Live fan-out of chat events to the connections joined to a room.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── hub.rs          - Room groups, membership guard, broadcast
//! ├── session.rs      - Per-connection state machine and dispatch
//! └── socket.rs       - WebSocket transport
//! ```
//!
//! # Events
//!
//! | inbound        | broadcast                           |
//! |----------------|-------------------------------------|
//! | `chat_message` | `chat_message` to every member      |
//! | `mark_read`    | `messages_read` to every member     |
//! | `typing`       | `typing_status` to everyone else    |
//!
//! Joining and leaving broadcast `user_status` (`online` / `offline`).
//!
//! Groups live in this process only and are rebuilt from nothing on
//! restart.

/// Room groups and broadcast
pub mod hub;

/// Connection state machine
pub mod session;

/// WebSocket transport
pub mod socket;

pub use hub::{ConnectionId, Membership, RoomHub};
pub use session::{ChatSession, Connect, Rejection};
pub use socket::chat_socket;
