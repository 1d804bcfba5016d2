//! Common test utilities and helpers
//!
//! Every test gets its own in-memory SQLite database with the migrations
//! applied, plus a small cast of seeded identities.

#![allow(dead_code)]

use axum::Router;
use sqlx::SqlitePool;

use fieldchat::backend::auth::{create_token, create_user};
use fieldchat::backend::catalog::{create_field, Field};
use fieldchat::backend::chat::ChatService;
use fieldchat::backend::routes::create_router;
use fieldchat::backend::server::{connect_database, AppState};
use fieldchat::shared::{AppConfig, Identity, Role};

pub const TEST_SECRET: &str = "fieldchat-test-secret";

/// Configuration pointing at a private in-memory database
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .database_url("sqlite::memory:")
        .jwt_secret(TEST_SECRET)
        .page_sizes(20, 100)
        .build()
        .expect("test config is valid")
}

/// Create a migrated in-memory pool
pub async fn create_test_pool() -> SqlitePool {
    connect_database("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database")
}

pub async fn seed_identity(pool: &SqlitePool, username: &str, role: Role) -> Identity {
    create_user(pool, username, &format!("{} Test", username), role)
        .await
        .expect("Failed to seed user")
}

pub async fn seed_field(pool: &SqlitePool, name: &str) -> Field {
    create_field(pool, name, "football", "North Park")
        .await
        .expect("Failed to seed field")
}

pub fn token_for(identity: &Identity) -> String {
    create_token(identity.id, Some(identity.username.clone()), TEST_SECRET)
        .expect("Failed to mint token")
}

/// Test fixture: app state plus two users and two admins
pub struct TestContext {
    pub state: AppState,
    pub user: Identity,
    pub other_user: Identity,
    pub admin: Identity,
    pub other_admin: Identity,
}

impl TestContext {
    pub async fn new() -> Self {
        let pool = create_test_pool().await;
        let state = AppState::new(pool.clone(), &test_config());

        let user = seed_identity(&pool, "alice", Role::User).await;
        let other_user = seed_identity(&pool, "bob", Role::User).await;
        let admin = seed_identity(&pool, "carol", Role::Admin).await;
        let other_admin = seed_identity(&pool, "dave", Role::Admin).await;

        Self {
            state,
            user,
            other_user,
            admin,
            other_admin,
        }
    }

    pub fn chat(&self) -> &ChatService {
        &self.state.chat
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.state.pool
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}
