//! Server Module
//!
//! Everything needed to stand the HTTP server up.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Database pool and migrations
//! └── init.rs         - App creation and background tasks
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldchat::backend::server::create_app;
//! use fieldchat::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(&config).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Database bootstrap
pub mod config;

/// Server initialization
pub mod init;

pub use config::connect_database;
pub use init::{create_app, spawn_hub_cleanup};
pub use state::AppState;
