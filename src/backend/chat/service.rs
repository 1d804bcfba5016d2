/**
 * Chat Service
 *
 * `ChatService` is the one entry point for chat operations. The HTTP
 * handlers and the websocket session both go through it, so access checks
 * and fan-out behave identically on either surface.
 *
 * Every room-scoped call loads the room first (`NotFound` if missing) and
 * then applies the access rule (`PermissionDenied` if it fails).
 *
 * Writes that produce a broadcast hold the room's sequencer from the store
 * write until the event is queued.
 */

use sqlx::SqlitePool;

use crate::backend::auth::users::get_admin_by_id;
use crate::backend::catalog::get_field_by_id;
use crate::backend::chat::access::can_access_room;
use crate::backend::chat::messages::{self, PageLimits, PageQuery, RECENT_MESSAGE_LIMIT};
use crate::backend::chat::{rooms, unread};
use crate::backend::error::{BackendError, BackendResult};
use crate::backend::realtime::hub::RoomHub;
use crate::shared::chat::{
    ChatMessage, ChatRoom, ChatRoomAssignment, FieldId, Identity, MessageDraft, MessageId,
    MessagePage, RoomDetail, RoomId, RoomSummary, RoomType, UserId,
};
use crate::shared::event::ServerEvent;

#[derive(Clone)]
pub struct ChatService {
    pool: SqlitePool,
    hub: RoomHub,
    limits: PageLimits,
}

impl ChatService {
    pub fn new(pool: SqlitePool, hub: RoomHub, limits: PageLimits) -> Self {
        Self { pool, hub, limits }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn hub(&self) -> &RoomHub {
        &self.hub
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Load a room and check that `identity` may use it
    pub async fn accessible_room(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> BackendResult<ChatRoom> {
        let room = rooms::get_room(&self.pool, room_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat room not found"))?;

        if !can_access_room(identity, &room) {
            tracing::warn!("[Chat] {} denied access to room {}", identity.id, room_id);
            return Err(BackendError::permission_denied("Access denied"));
        }

        Ok(room)
    }

    /// Return the caller's active room for the key, creating it if needed
    ///
    /// The boolean is `true` when a new room was created.
    pub async fn find_or_create_room(
        &self,
        user: &Identity,
        field_id: Option<FieldId>,
        room_type: RoomType,
    ) -> BackendResult<(ChatRoom, bool)> {
        if let Some(field_id) = field_id {
            if get_field_by_id(&self.pool, field_id).await?.is_none() {
                return Err(BackendError::not_found("Field not found"));
            }
        }

        let found = rooms::find_or_create_room(&self.pool, user.id, field_id, room_type).await?;
        Ok(found)
    }

    /// Rooms visible to `identity`, newest activity first
    ///
    /// Admins see every room, users their own. Unread counts are from the
    /// viewer's side.
    pub async fn list_rooms(&self, identity: &Identity) -> BackendResult<Vec<RoomSummary>> {
        let owner = if identity.is_admin() {
            None
        } else {
            Some(identity.id)
        };

        let rooms = rooms::list_rooms(&self.pool, owner).await?;
        let unread = unread::unread_by_room(&self.pool, identity.role).await?;

        let mut summaries = Vec::with_capacity(rooms.len());
        for room in rooms {
            let last_message = messages::last_message_preview(&self.pool, room.id).await?;
            summaries.push(RoomSummary {
                room_type_display: room.room_type.label().to_string(),
                unread_count: unread.get(&room.id).copied().unwrap_or(0),
                last_message,
                room,
            });
        }

        Ok(summaries)
    }

    /// Room with its most recent messages
    pub async fn room_detail(&self, identity: &Identity, room_id: RoomId) -> BackendResult<RoomDetail> {
        let room = self.accessible_room(identity, room_id).await?;
        let messages = messages::latest_messages(&self.pool, room.id, RECENT_MESSAGE_LIMIT).await?;

        Ok(RoomDetail {
            room_type_display: room.room_type.label().to_string(),
            messages,
            room,
        })
    }

    /// Assign `admin_id` to a room on behalf of `assigned_by`
    ///
    /// Checks run in order: caller is an admin, room exists, `admin_id`
    /// given, `admin_id` names an admin. A repeat assignment still appends
    /// an audit record.
    pub async fn assign_admin(
        &self,
        assigned_by: &Identity,
        room_id: RoomId,
        admin_id: Option<UserId>,
    ) -> BackendResult<ChatRoomAssignment> {
        if !assigned_by.is_admin() {
            return Err(BackendError::permission_denied(
                "Only admin can assign chat rooms",
            ));
        }

        let room = rooms::get_room(&self.pool, room_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat room not found"))?;

        let admin_id =
            admin_id.ok_or_else(|| BackendError::validation("admin_id", "admin_id is required"))?;

        let admin = get_admin_by_id(&self.pool, admin_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Admin not found"))?;

        let assignment = rooms::assign_admin(&self.pool, room.id, admin.id, assigned_by.id).await?;

        tracing::info!(
            "[Chat] Room {} assigned to {} by {}",
            room.id,
            admin.username,
            assigned_by.username
        );

        Ok(assignment)
    }

    /// Assignment history of a room (admins only)
    pub async fn assignments(
        &self,
        identity: &Identity,
        room_id: RoomId,
    ) -> BackendResult<Vec<ChatRoomAssignment>> {
        if !identity.is_admin() {
            return Err(BackendError::permission_denied(
                "Only admin can view chat room assignments",
            ));
        }

        let room = rooms::get_room(&self.pool, room_id)
            .await?
            .ok_or_else(|| BackendError::not_found("Chat room not found"))?;

        Ok(rooms::list_assignments(&self.pool, room.id).await?)
    }

    /// Soft-close a room
    pub async fn close_room(&self, identity: &Identity, room_id: RoomId) -> BackendResult<ChatRoom> {
        let mut room = self.accessible_room(identity, room_id).await?;

        if room.is_active {
            rooms::deactivate_room(&self.pool, room.id).await?;
            room.is_active = false;
            tracing::info!("[Chat] Room {} closed by {}", room.id, identity.id);
        }

        Ok(room)
    }

    /// One page of a room's history
    pub async fn list_messages(
        &self,
        identity: &Identity,
        room_id: RoomId,
        query: PageQuery,
    ) -> BackendResult<MessagePage> {
        let room = self.accessible_room(identity, room_id).await?;
        let pagination = self.limits.resolve(query);

        Ok(messages::list_messages(&self.pool, room.id, pagination).await?)
    }

    /// Persist a message and fan it out to the room
    ///
    /// A draft with blank content and no attachment is dropped: nothing is
    /// stored or broadcast and the result is `Ok(None)`.
    pub async fn post_message(
        &self,
        sender: &Identity,
        room_id: RoomId,
        draft: MessageDraft,
    ) -> BackendResult<Option<ChatMessage>> {
        let room = self.accessible_room(sender, room_id).await?;

        if draft.is_blank() {
            tracing::debug!("[Chat] Ignoring blank message from {} in room {}", sender.id, room.id);
            return Ok(None);
        }

        let _turn = self.hub.sequence(room.id).await;
        let message = messages::insert_message(&self.pool, room.id, sender, &draft).await?;

        self.hub.broadcast(
            room.id,
            &ServerEvent::ChatMessage {
                message: message.clone(),
            },
        );

        tracing::debug!("[Chat] Message {} stored in room {}", message.id, room.id);
        Ok(Some(message))
    }

    /// Acknowledge messages from the reader's side and fan out the receipt
    ///
    /// Returns how many flags actually changed.
    pub async fn mark_read(
        &self,
        reader: &Identity,
        room_id: RoomId,
        message_ids: Vec<MessageId>,
    ) -> BackendResult<u64> {
        let room = self.accessible_room(reader, room_id).await?;

        let _turn = self.hub.sequence(room.id).await;
        let updated = messages::mark_read(&self.pool, room.id, reader.role, &message_ids).await?;

        self.hub
            .broadcast(room.id, &ServerEvent::messages_read(reader, message_ids));

        Ok(updated)
    }

    /// Unread count across the rooms that concern `identity`
    pub async fn unread_count(&self, identity: &Identity) -> BackendResult<i64> {
        Ok(unread::total_unread_for(&self.pool, identity).await?)
    }
}
