/**
 * Chat Routes
 *
 * # Routes
 *
 * - `GET /api/chat/rooms` - list rooms
 * - `POST /api/chat/rooms` - find or create a room
 * - `GET /api/chat/rooms/{room_id}` - room detail
 * - `POST /api/chat/rooms/{room_id}/assign_admin` - assign an admin
 * - `GET /api/chat/rooms/{room_id}/assignments` - assignment history
 * - `POST /api/chat/rooms/{room_id}/close` - soft-close
 * - `GET /api/chat/rooms/{room_id}/messages` - paginated history
 * - `POST /api/chat/rooms/{room_id}/send_message` - post a message
 * - `POST /api/chat/rooms/{room_id}/mark_read` - acknowledge messages
 * - `GET /ws/chat/{room_id}` - live connection (see `realtime::socket`)
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::chat::handlers::{
    assign_admin, close_room, create_room, get_room, list_assignments, list_messages,
    list_rooms, mark_read, send_message,
};
use crate::backend::realtime::socket::chat_socket;
use crate::backend::server::state::AppState;

/// Configure the authenticated `/api/chat` routes
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/chat/rooms", get(list_rooms).post(create_room))
        .route("/api/chat/rooms/{room_id}", get(get_room))
        .route("/api/chat/rooms/{room_id}/assign_admin", post(assign_admin))
        .route("/api/chat/rooms/{room_id}/assignments", get(list_assignments))
        .route("/api/chat/rooms/{room_id}/close", post(close_room))
        .route("/api/chat/rooms/{room_id}/messages", get(list_messages))
        .route("/api/chat/rooms/{room_id}/send_message", post(send_message))
        .route("/api/chat/rooms/{room_id}/mark_read", post(mark_read))
}

/// Configure the websocket route
///
/// Not behind `auth_middleware`: anonymous connections must reach the
/// session so they are closed rather than refused with 401.
pub fn configure_socket_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/ws/chat/{room_id}", get(chat_socket))
}
