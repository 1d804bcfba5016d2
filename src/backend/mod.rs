//! Backend Module
//!
//! Server-side code for the support chat. Only compiled with the `ssr`
//! feature.
//!
//! # Architecture
//!
//! - **`server`** - App creation, `AppState`, database bootstrap
//! - **`routes`** - Router assembly
//! - **`chat`** - Rooms, messages, read flags, unread counts, HTTP handlers
//! - **`realtime`** - Room hub, chat sessions, websocket transport
//! - **`auth`** - Token verification and identity lookup
//! - **`catalog`** - Read-only field lookup
//! - **`middleware`** - Request authentication
//! - **`error`** - Backend error taxonomy
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── chat/           - Chat operations and handlers
//! ├── realtime/       - Live fan-out
//! ├── auth/           - Identity
//! ├── catalog/        - Field catalog
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Data Flow
//!
//! A request (HTTP or websocket frame) resolves an `Identity`, passes the
//! room access check inside `ChatService`, hits SQLite, and any resulting
//! event is fanned out through the `RoomHub` to the room's live
//! connections.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Chat rooms, messages and handlers
pub mod chat;

/// Real-time fan-out
pub mod realtime;

/// Backend error types
pub mod error;

/// Identity verification and lookup
pub mod auth;

/// Field catalog lookup
pub mod catalog;

/// Middleware for request processing
pub mod middleware;

pub use chat::ChatService;
pub use error::{BackendError, BackendResult};
pub use realtime::RoomHub;
pub use server::{create_app, AppState};
