/**
 * Chat Request and Response Types
 *
 * Bodies accepted and returned by the `/api/chat` endpoints.
 */

use serde::{Deserialize, Serialize};

use crate::shared::chat::{ChatRoomAssignment, FieldId, MessageId, RoomType, UserId};

/// Body of `POST /api/chat/rooms`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub field_id: Option<FieldId>,
    #[serde(default)]
    pub room_type: RoomType,
}

/// Body of `POST /api/chat/rooms/{id}/assign_admin`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignAdminRequest {
    #[serde(default)]
    pub admin_id: Option<UserId>,
}

/// Body of `POST /api/chat/rooms/{id}/mark_read`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkReadRequest {
    #[serde(default)]
    pub message_ids: Vec<MessageId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignAdminResponse {
    pub message: String,
    pub assignment: ChatRoomAssignment,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadResponse {
    pub message: String,
    pub updated: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}
