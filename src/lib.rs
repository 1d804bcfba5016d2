//! fieldchat - Support Chat for a Sports-Field Booking Platform
//!
//! Users open a chat room about a field, a booking or a general question;
//! admins pick rooms up and answer. Messages are stored in SQLite, carry a
//! read flag per side, and are fanned out live to everyone connected to the
//! room over a websocket.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain serde types used on both surfaces
//!   - Rooms, messages, assignments, identities
//!   - Live protocol events
//!   - Configuration and shared errors
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP API and websocket endpoint
//!   - Room lifecycle, message store, read tracking, unread counts
//!   - In-process broadcast groups per room
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables `backend` and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use fieldchat::backend::server::create_app;
//! use fieldchat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
