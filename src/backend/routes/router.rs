/**
 * Router Configuration
 *
 * Combines all route groups into the application router.
 *
 * # Layout
 *
 * 1. `GET /health` - public
 * 2. `/api/...` - behind `auth_middleware`
 * 3. `/ws/chat/{room_id}` - resolves identity itself
 * 4. Fallback - JSON 404
 *
 * Every request is traced with `TraceLayer`.
 */

use axum::{middleware, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::backend::error::BackendError;
use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::chat_routes::{configure_chat_routes, configure_socket_routes};
use crate::backend::server::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn not_found() -> BackendError {
    BackendError::not_found("Not found")
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let api = configure_chat_routes(configure_api_routes(Router::new())).route_layer(
        middleware::from_fn_with_state(app_state.clone(), auth_middleware),
    );

    let router = Router::new().route("/health", get(health));
    let router = configure_socket_routes(router);

    router
        .merge(api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
