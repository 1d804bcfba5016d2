//! Middleware Module
//!
//! HTTP middleware for the backend server.
//!
//! - **`auth`** - bearer-token authentication for the `/api` routes
//! - **`extract`** - `Json` / `Path` / `Query` extractors with JSON rejections

pub mod auth;

pub mod extract;

pub use auth::{auth_middleware, bearer_token, resolve_identity, AuthUser};
pub use extract::{ApiJson, ApiPath, ApiQuery};
