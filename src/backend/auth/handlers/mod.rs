//! Authentication Handlers Module
//!
//! - **`get_me`** - GET /api/auth/me - identity resolved from the bearer token

/// Get current identity handler
pub mod me;

pub use me::get_me;
