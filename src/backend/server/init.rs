/**
 * Server Initialization
 *
 * Builds the Axum application from an `AppConfig`:
 * 1. Open the database pool and run migrations
 * 2. Create the room hub and chat service (`AppState`)
 * 3. Configure the router
 * 4. Start the periodic hub cleanup task
 */

use std::time::Duration;

use axum::Router;
use tokio::task::JoinHandle;

use crate::backend::realtime::hub::RoomHub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::connect_database;
use crate::backend::server::state::AppState;
use crate::shared::config::AppConfig;

/// Create and configure the Axum application
///
/// Fails only if the database cannot be opened or migrated.
pub async fn create_app(config: &AppConfig) -> Result<Router<()>, sqlx::Error> {
    tracing::info!("[Server] Initializing fieldchat backend");

    let pool = connect_database(&config.database_url, config.max_connections).await?;
    let app_state = AppState::new(pool, config);

    let app = create_router(app_state.clone());

    spawn_hub_cleanup(
        app_state.hub.clone(),
        Duration::from_secs(config.cleanup_interval_secs),
    );

    tracing::info!("[Server] Router configured with periodic hub cleanup");

    Ok(app)
}

/// Periodically drop room groups nobody is using
pub fn spawn_hub_cleanup(hub: RoomHub, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = hub.cleanup_idle_groups();
            if removed > 0 {
                tracing::debug!("[Realtime] Cleaned up {} idle room groups", removed);
            }
        }
    })
}
