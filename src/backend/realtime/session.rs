/**
 * Chat Session
 *
 * One live connection to one room, independent of the transport.
 *
 * # States
 *
 * `Connecting -> Joined -> Closed`
 *
 * `ChatSession::connect` either returns a joined session or a rejection.
 * Anonymous callers, unknown rooms and rooms the caller may not use are all
 * rejected before anything is registered or broadcast. The transport closes
 * those connections without an error event.
 *
 * Once joined, inbound text frames go through `handle_text`. Nothing in
 * there ends the session: parse failures and failed operations are reported
 * back to this connection as `error` events.
 *
 * `close` (or dropping the session) announces `offline` and deregisters,
 * exactly once.
 */

use std::fmt;

use crate::backend::chat::service::ChatService;
use crate::backend::error::{BackendError, BackendResult, ErrorKind};
use crate::backend::realtime::hub::{ConnectionId, EventReceiver, Membership};
use crate::shared::chat::{Identity, RoomId};
use crate::shared::event::{ClientEvent, ServerEvent};

/// Why a connection never reached `Joined`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Anonymous,
    RoomNotFound,
    AccessDenied,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Anonymous => f.write_str("anonymous connection"),
            Rejection::RoomNotFound => f.write_str("room not found"),
            Rejection::AccessDenied => f.write_str("access denied"),
        }
    }
}

/// Outcome of a connection attempt
pub enum Connect {
    Joined(ChatSession, EventReceiver),
    Rejected(Rejection),
}

pub struct ChatSession {
    chat: ChatService,
    membership: Membership,
}

impl ChatSession {
    /// Authenticate, check access and join the room's group
    ///
    /// Only store failures come back as `Err`.
    pub async fn connect(
        chat: &ChatService,
        identity: Option<Identity>,
        room_id: RoomId,
    ) -> BackendResult<Connect> {
        let Some(identity) = identity else {
            tracing::info!("[Realtime] Rejected anonymous connection to room {}", room_id);
            return Ok(Connect::Rejected(Rejection::Anonymous));
        };

        if let Err(err) = chat.accessible_room(&identity, room_id).await {
            let rejection = match err.kind() {
                ErrorKind::NotFound => Rejection::RoomNotFound,
                ErrorKind::PermissionDenied => Rejection::AccessDenied,
                _ => return Err(err),
            };
            tracing::info!(
                "[Realtime] Rejected {} for room {}: {}",
                identity.id,
                room_id,
                rejection
            );
            return Ok(Connect::Rejected(rejection));
        }

        let (membership, events) = chat.hub().join(room_id, identity);
        let session = ChatSession {
            chat: chat.clone(),
            membership,
        };

        Ok(Connect::Joined(session, events))
    }

    pub fn identity(&self) -> &Identity {
        self.membership.identity()
    }

    pub fn room_id(&self) -> RoomId {
        self.membership.room_id()
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.membership.connection_id()
    }

    /// Handle one inbound text frame
    pub async fn handle_text(&self, text: &str) {
        let result = match ClientEvent::parse(text) {
            Ok(event) => self.dispatch(event).await,
            Err(err) => Err(BackendError::from(err)),
        };

        if let Err(err) = result {
            match err.kind() {
                ErrorKind::Internal => tracing::error!(
                    "[Realtime] Failed to handle frame from {} in room {}: {:?}",
                    self.identity().id,
                    self.room_id(),
                    err
                ),
                _ => tracing::debug!(
                    "[Realtime] Rejected frame from {} in room {}: {}",
                    self.identity().id,
                    self.room_id(),
                    err
                ),
            }
            self.reply(ServerEvent::error(err.message()));
        }
    }

    async fn dispatch(&self, event: ClientEvent) -> BackendResult<()> {
        match event {
            ClientEvent::ChatMessage(draft) => {
                self.chat
                    .post_message(self.identity(), self.room_id(), draft)
                    .await?;
            }
            ClientEvent::MarkRead { message_ids } => {
                self.chat
                    .mark_read(self.identity(), self.room_id(), message_ids)
                    .await?;
            }
            ClientEvent::Typing { is_typing } => {
                self.membership.hub().broadcast_except(
                    self.room_id(),
                    self.connection_id(),
                    &ServerEvent::typing(self.identity(), is_typing),
                );
            }
        }
        Ok(())
    }

    /// Send an event to this connection only
    fn reply(&self, event: ServerEvent) {
        self.membership
            .hub()
            .send_to(self.room_id(), self.connection_id(), event);
    }

    /// Leave the room: broadcast `offline` and deregister
    pub fn close(self) {
        self.membership.leave();
    }
}
