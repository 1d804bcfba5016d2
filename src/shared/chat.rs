/**
 * Chat Data Model
 *
 * This module defines the rooms, messages and assignment records of the
 * support chat, along with the identity of whoever is talking.
 *
 * These types are shared between the HTTP surface and the live websocket
 * protocol, and serialize to the same JSON in both places.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Chat room identifier
pub type RoomId = i64;
/// Chat message identifier (strictly increasing by creation order)
pub type MessageId = i64;
/// User identifier, issued by the identity provider
pub type UserId = Uuid;
/// Sports field identifier from the field catalog
pub type FieldId = i64;

/// Role carried on a resolved identity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(SharedError::validation("role", format!("unknown role '{}'", other))),
        }
    }
}

/// An authenticated caller
///
/// Resolved by the identity provider from a bearer token. Also used as the
/// `sender` block of serialized messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: Role,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// What a chat room is about
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    #[default]
    General,
    Booking,
    FieldInquiry,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::General => "general",
            RoomType::Booking => "booking",
            RoomType::FieldInquiry => "field_inquiry",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RoomType::General => "General Support",
            RoomType::Booking => "Booking Support",
            RoomType::FieldInquiry => "Field Inquiry",
        }
    }
}

impl FromStr for RoomType {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(RoomType::General),
            "booking" => Ok(RoomType::Booking),
            "field_inquiry" => Ok(RoomType::FieldInquiry),
            other => Err(SharedError::validation(
                "room_type",
                format!("unknown room type '{}'", other),
            )),
        }
    }
}

/// Kind of chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Image => "image",
            MessageKind::File => "file",
            MessageKind::System => "system",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageKind::Text => "Text",
            MessageKind::Image => "Image",
            MessageKind::File => "File",
            MessageKind::System => "System Message",
        }
    }
}

impl FromStr for MessageKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(MessageKind::Text),
            "image" => Ok(MessageKind::Image),
            "file" => Ok(MessageKind::File),
            "system" => Ok(MessageKind::System),
            other => Err(SharedError::validation(
                "message_type",
                format!("unknown message type '{}'", other),
            )),
        }
    }
}

/// A conversation between one user and at most one assigned admin
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRoom {
    pub id: RoomId,
    /// Owning user, immutable after creation
    pub user_id: UserId,
    /// Currently assigned admin, changed only through assignment
    pub admin_id: Option<UserId>,
    pub field_id: Option<FieldId>,
    pub room_type: RoomType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    /// Creation time of the most recent message (never moves backwards)
    pub last_message_at: DateTime<Utc>,
}

/// A persisted chat message
///
/// `is_read_by_user` / `is_read_by_admin` record whether each side has
/// acknowledged the message. The sender's own side is set at creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender: Identity,
    pub message_type: MessageKind,
    /// Label for `message_type`, e.g. "System Message"
    pub message_type_display: String,
    pub content: String,
    pub file_url: Option<String>,
    pub is_read_by_user: bool,
    pub is_read_by_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Whether the member with `role` has acknowledged this message
    pub fn is_read_by(&self, role: Role) -> bool {
        match role {
            Role::User => self.is_read_by_user,
            Role::Admin => self.is_read_by_admin,
        }
    }
}

/// One admin-to-room assignment event (append-only audit log)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRoomAssignment {
    pub id: i64,
    pub room_id: RoomId,
    pub admin_id: UserId,
    pub assigned_by: Option<UserId>,
    pub assigned_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Unsaved message content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MessageDraft {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub message_type: MessageKind,
}

impl MessageDraft {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Attachment URL, treating an empty string as absent
    pub fn attachment(&self) -> Option<&str> {
        self.file_url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }

    /// A draft with blank content and no attachment is dropped silently
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty() && self.attachment().is_none()
    }
}

/// One window of a room's message history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePage {
    pub messages: Vec<ChatMessage>,
    pub has_more: bool,
}

/// Short preview of the newest message in a room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastMessagePreview {
    pub content: String,
    pub sender: String,
    pub created_at: DateTime<Utc>,
}

/// Room as shown in a room list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummary {
    #[serde(flatten)]
    pub room: ChatRoom,
    pub room_type_display: String,
    pub last_message: Option<LastMessagePreview>,
    /// Unread count from the viewer's side
    pub unread_count: i64,
}

/// Room with its most recent messages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: ChatRoom,
    pub room_type_display: String,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_room_type_wire_names() {
        let json = serde_json::to_string(&RoomType::FieldInquiry).unwrap();
        assert_eq!(json, "\"field_inquiry\"");
        assert_eq!("booking".parse::<RoomType>().unwrap(), RoomType::Booking);
        assert_eq!(RoomType::default(), RoomType::General);
        assert_eq!(RoomType::General.label(), "General Support");
    }

    #[test]
    fn test_blank_draft_detection() {
        assert!(MessageDraft::text("   ").is_blank());
        assert!(MessageDraft::default().is_blank());

        let with_empty_url = MessageDraft {
            file_url: Some(String::new()),
            ..MessageDraft::default()
        };
        assert!(with_empty_url.is_blank());

        let attachment_only = MessageDraft {
            file_url: Some("https://cdn.example.com/pitch.png".to_string()),
            message_type: MessageKind::Image,
            ..MessageDraft::default()
        };
        assert!(!attachment_only.is_blank());
        assert!(!MessageDraft::text("hello").is_blank());
    }

    #[test]
    fn test_draft_defaults_when_fields_missing() {
        let draft: MessageDraft = serde_json::from_str(r#"{"content":"hi"}"#).unwrap();
        assert_eq!(draft.message_type, MessageKind::Text);
        assert!(draft.file_url.is_none());
    }
}
