/**
 * Room Handlers
 *
 * - `GET /api/chat/rooms` - rooms visible to the caller
 * - `POST /api/chat/rooms` - find or create the caller's room
 * - `GET /api/chat/rooms/{id}` - room detail with recent messages
 * - `POST /api/chat/rooms/{id}/assign_admin` - assign an admin (admins only)
 * - `GET /api/chat/rooms/{id}/assignments` - assignment history (admins only)
 * - `POST /api/chat/rooms/{id}/close` - soft-close
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use crate::backend::chat::handlers::types::{
    AssignAdminRequest, AssignAdminResponse, CreateRoomRequest,
};
use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::{ApiJson, ApiPath, AuthUser};
use crate::shared::chat::{ChatRoom, ChatRoomAssignment, RoomDetail, RoomId, RoomSummary};

/// List rooms, newest activity first
pub async fn list_rooms(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<Vec<RoomSummary>>> {
    Ok(Json(chat.list_rooms(&identity).await?))
}

/// Find or create a room
///
/// Responds `201 Created` for a new room and `200 OK` when the caller
/// already had an active room for the same field or type.
pub async fn create_room(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<CreateRoomRequest>,
) -> BackendResult<(StatusCode, Json<ChatRoom>)> {
    let (room, created) = chat
        .find_or_create_room(&identity, request.field_id, request.room_type)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(room)))
}

pub async fn get_room(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
) -> BackendResult<Json<RoomDetail>> {
    Ok(Json(chat.room_detail(&identity, room_id).await?))
}

pub async fn assign_admin(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
    ApiJson(request): ApiJson<AssignAdminRequest>,
) -> BackendResult<Json<AssignAdminResponse>> {
    let assignment = chat
        .assign_admin(&identity, room_id, request.admin_id)
        .await?;

    Ok(Json(AssignAdminResponse {
        message: "Admin assigned successfully".to_string(),
        assignment,
    }))
}

pub async fn list_assignments(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
) -> BackendResult<Json<Vec<ChatRoomAssignment>>> {
    Ok(Json(chat.assignments(&identity, room_id).await?))
}

pub async fn close_room(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
) -> BackendResult<Json<ChatRoom>> {
    Ok(Json(chat.close_room(&identity, room_id).await?))
}
