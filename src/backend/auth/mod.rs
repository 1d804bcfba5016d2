//! Authentication Module
//!
//! Chat does not issue credentials. Bearer tokens come from the identity
//! provider; this module verifies them and loads the caller's identity.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - Identity lookups against the users table
//! ├── sessions.rs     - JWT verification (and minting for tooling/tests)
//! └── handlers/       - HTTP handlers
//!     ├── mod.rs      - Handler exports
//!     └── me.rs       - Get current identity handler
//! ```
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <jwt>`
//! 2. Token is verified and `sub` parsed as a user id
//! 3. The user row is loaded into an `Identity` (unknown users are rejected)

/// Identity lookups
pub mod users;

/// JWT token verification
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::get_me;
pub use sessions::{create_token, verify_token, Claims};
pub use users::{create_user, get_admin_by_id, get_user_by_id};
