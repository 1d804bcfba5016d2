/**
 * Application State
 *
 * `AppState` is the central state container handed to every handler.
 * The `FromRef` implementations let handlers extract just the part they
 * need, e.g. `State(chat): State<ChatService>`.
 *
 * Everything in here is cheap to clone: the pool and the hub are
 * reference-counted handles.
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::backend::chat::messages::PageLimits;
use crate::backend::chat::service::ChatService;
use crate::backend::realtime::hub::RoomHub;
use crate::shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    /// Chat operations (rooms, messages, read flags, fan-out)
    pub chat: ChatService,

    /// Live connection groups, shared with `chat`
    pub hub: RoomHub,

    /// Database connection pool
    pub pool: SqlitePool,

    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Build the state from an open pool and the loaded configuration
    pub fn new(pool: SqlitePool, config: &AppConfig) -> Self {
        let hub = RoomHub::new();
        let limits = PageLimits {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        };

        Self {
            chat: ChatService::new(pool.clone(), hub.clone(), limits),
            hub,
            pool,
            jwt_secret: Arc::from(config.jwt_secret.as_str()),
        }
    }
}

impl FromRef<AppState> for ChatService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}

impl FromRef<AppState> for RoomHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}
