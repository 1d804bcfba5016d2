/**
 * Live Chat Protocol
 *
 * This module defines the JSON frames exchanged over a room's websocket.
 *
 * # Inbound (client -> server)
 *
 * Every frame is an object with a `type` discriminator:
 * - `chat_message` - `{content, file_url?, message_type?}`
 * - `mark_read` - `{message_ids: [..]}`
 * - `typing` - `{is_typing}`
 *
 * A frame without `type` is treated as `chat_message`.
 *
 * # Outbound (server -> client)
 *
 * - `chat_message` - `{message}`
 * - `user_status` - `{user_id, username, status}`
 * - `messages_read` - `{message_ids, reader_id, reader_role}`
 * - `typing_status` - `{user_id, username, is_typing}`
 * - `error` - `{error}`
 */
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::chat::{ChatMessage, Identity, MessageDraft, MessageId, Role, UserId};
use crate::shared::error::SharedError;

/// An event received from a connected client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Post a message to the room
    ChatMessage(MessageDraft),
    /// Acknowledge messages on the reader's side
    MarkRead { message_ids: Vec<MessageId> },
    /// Typing indicator
    Typing { is_typing: bool },
}

#[derive(Deserialize)]
struct MarkReadFrame {
    #[serde(default)]
    message_ids: Vec<MessageId>,
}

#[derive(Deserialize)]
struct TypingFrame {
    #[serde(default)]
    is_typing: bool,
}

impl ClientEvent {
    /// Parse one inbound text frame
    ///
    /// Any failure is reported as `SharedError::MalformedInput` so the
    /// caller can echo it back as an `error` event.
    pub fn parse(text: &str) -> Result<Self, SharedError> {
        let value: Value =
            serde_json::from_str(text).map_err(|_| SharedError::malformed("Invalid JSON"))?;

        let kind = match value.as_object() {
            Some(object) => match object.get("type") {
                None => "chat_message".to_string(),
                Some(Value::String(kind)) => kind.clone(),
                Some(_) => return Err(SharedError::malformed("Event type must be a string")),
            },
            None => return Err(SharedError::malformed("Expected a JSON object")),
        };

        match kind.as_str() {
            "chat_message" => serde_json::from_value::<MessageDraft>(value)
                .map(ClientEvent::ChatMessage)
                .map_err(|e| SharedError::malformed(format!("Invalid chat_message payload: {}", e))),
            "mark_read" => serde_json::from_value::<MarkReadFrame>(value)
                .map(|frame| ClientEvent::MarkRead {
                    message_ids: frame.message_ids,
                })
                .map_err(|e| SharedError::malformed(format!("Invalid mark_read payload: {}", e))),
            "typing" => serde_json::from_value::<TypingFrame>(value)
                .map(|frame| ClientEvent::Typing {
                    is_typing: frame.is_typing,
                })
                .map_err(|e| SharedError::malformed(format!("Invalid typing payload: {}", e))),
            other => Err(SharedError::malformed(format!("Unknown event type: {}", other))),
        }
    }
}

/// Presence of a member in a room group
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Offline,
}

/// An event fanned out to a room group (or sent to one connection)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    ChatMessage {
        message: ChatMessage,
    },
    UserStatus {
        user_id: UserId,
        username: String,
        status: PresenceStatus,
    },
    MessagesRead {
        message_ids: Vec<MessageId>,
        reader_id: UserId,
        reader_role: Role,
    },
    TypingStatus {
        user_id: UserId,
        username: String,
        is_typing: bool,
    },
    Error {
        error: String,
    },
}

impl ServerEvent {
    pub fn presence(identity: &Identity, status: PresenceStatus) -> Self {
        Self::UserStatus {
            user_id: identity.id,
            username: identity.username.clone(),
            status,
        }
    }

    pub fn messages_read(reader: &Identity, message_ids: Vec<MessageId>) -> Self {
        Self::MessagesRead {
            message_ids,
            reader_id: reader.id,
            reader_role: reader.role,
        }
    }

    pub fn typing(identity: &Identity, is_typing: bool) -> Self {
        Self::TypingStatus {
            user_id: identity.id,
            username: identity.username.clone(),
            is_typing,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Wire name of this event (`type` field)
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerEvent::ChatMessage { .. } => "chat_message",
            ServerEvent::UserStatus { .. } => "user_status",
            ServerEvent::MessagesRead { .. } => "messages_read",
            ServerEvent::TypingStatus { .. } => "typing_status",
            ServerEvent::Error { .. } => "error",
        }
    }

    pub fn to_json(&self) -> Result<String, SharedError> {
        Ok(serde_json::to_string(self)?)
    }
}
