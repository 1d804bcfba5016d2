//! Route Configuration Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! ├── chat_routes.rs  - Room, message and websocket routes
//! └── api_routes.rs   - Identity and unread-count routes
//! ```

/// Main router creation
pub mod router;

/// Chat routes
pub mod chat_routes;

/// API routes
pub mod api_routes;

pub use router::create_router;
