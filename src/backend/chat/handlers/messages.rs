/**
 * Message Handlers
 *
 * - `GET /api/chat/rooms/{id}/messages` - paginated history
 * - `POST /api/chat/rooms/{id}/send_message` - post a message
 * - `POST /api/chat/rooms/{id}/mark_read` - acknowledge messages
 * - `GET /api/chat/unread_count` - total unread for the caller
 *
 * Posts and read receipts made here are fanned out to the room's live
 * connections as well.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::chat::handlers::types::{MarkReadRequest, MarkReadResponse, UnreadCountResponse};
use crate::backend::chat::messages::PageQuery;
use crate::backend::chat::service::ChatService;
use crate::backend::error::BackendResult;
use crate::backend::middleware::{ApiJson, ApiPath, ApiQuery, AuthUser};
use crate::shared::chat::{MessageDraft, MessagePage, RoomId};

/// Paginated history
///
/// # Query Parameters
///
/// - `page` - 1-based page number (default 1)
/// - `page_size` - messages per page (default and maximum from config)
pub async fn list_messages(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> BackendResult<Json<MessagePage>> {
    Ok(Json(chat.list_messages(&identity, room_id, query).await?))
}

/// Post a message
///
/// `201 Created` with the stored message, or `204 No Content` when the
/// draft was blank and nothing was stored.
pub async fn send_message(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
    ApiJson(draft): ApiJson<MessageDraft>,
) -> BackendResult<Response> {
    let response = match chat.post_message(&identity, room_id, draft).await? {
        Some(message) => (StatusCode::CREATED, Json(message)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}

pub async fn mark_read(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
    ApiPath(room_id): ApiPath<RoomId>,
    ApiJson(request): ApiJson<MarkReadRequest>,
) -> BackendResult<Json<MarkReadResponse>> {
    let updated = chat
        .mark_read(&identity, room_id, request.message_ids)
        .await?;

    Ok(Json(MarkReadResponse {
        message: "Messages marked as read".to_string(),
        updated,
    }))
}

pub async fn unread_count(
    State(chat): State<ChatService>,
    AuthUser(identity): AuthUser,
) -> BackendResult<Json<UnreadCountResponse>> {
    let unread_count = chat.unread_count(&identity).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}
