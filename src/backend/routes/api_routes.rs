/**
 * API Routes
 *
 * - `GET /api/auth/me` - current identity
 * - `GET /api/chat/unread_count` - total unread for the caller
 *
 * All routes here sit behind `auth_middleware`.
 */

use axum::{routing::get, Router};

use crate::backend::auth::get_me;
use crate::backend::chat::handlers::unread_count;
use crate::backend::server::state::AppState;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/auth/me", get(get_me))
        .route("/api/chat/unread_count", get(unread_count))
}
