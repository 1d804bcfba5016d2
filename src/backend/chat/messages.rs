/**
 * Message Store & Read Tracking
 *
 * This module persists chat messages, flips read flags and pages through
 * a room's history.
 *
 * # Creation
 *
 * A message and its room's `last_message_at` are written in one
 * transaction. The sender's own read flag is set at insert time. The
 * message timestamp is clamped so `last_message_at` never moves backwards,
 * even if the clock does.
 *
 * # Read flags
 *
 * `mark_read` only touches rows in the given room whose flag is still
 * unset, so unknown ids, ids from other rooms and repeats are no-ops.
 */

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::shared::chat::{
    ChatMessage, Identity, LastMessagePreview, MessageDraft, MessageId, MessageKind, MessagePage,
    Role, RoomId,
};

/// Number of messages included in a room detail view
pub const RECENT_MESSAGE_LIMIT: i64 = 50;

const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.room_id, m.message_type, m.content, m.file_url,
           m.is_read_by_user, m.is_read_by_admin, m.created_at, m.updated_at,
           u.id AS sender_id, u.username AS sender_username,
           u.full_name AS sender_full_name, u.role AS sender_role
    FROM chat_messages m
    JOIN users u ON u.id = m.sender_id
"#;

/// Page size bounds applied to history requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Raw `page` / `page_size` query parameters
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// A resolved, always-positive page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl PageLimits {
    /// Fill in defaults and clamp into range
    ///
    /// Missing `page` is 1 and missing `page_size` is the default size.
    /// Values below 1 become 1; `page_size` above the maximum becomes the
    /// maximum.
    pub fn resolve(&self, query: PageQuery) -> Pagination {
        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1));

        Pagination { page, page_size }
    }
}

fn message_from_row(row: &SqliteRow) -> Result<ChatMessage, sqlx::Error> {
    let decode = |e: crate::shared::SharedError| sqlx::Error::Decode(e.to_string().into());

    let message_type: String = row.try_get("message_type")?;
    let message_type = message_type.parse::<MessageKind>().map_err(decode)?;
    let sender_role: String = row.try_get("sender_role")?;
    let sender_role = sender_role.parse::<Role>().map_err(decode)?;

    Ok(ChatMessage {
        id: row.try_get("id")?,
        room_id: row.try_get("room_id")?,
        sender: Identity {
            id: row.try_get("sender_id")?,
            username: row.try_get("sender_username")?,
            full_name: row.try_get("sender_full_name")?,
            role: sender_role,
        },
        message_type,
        message_type_display: message_type.label().to_string(),
        content: row.try_get("content")?,
        file_url: row.try_get("file_url")?,
        is_read_by_user: row.try_get("is_read_by_user")?,
        is_read_by_admin: row.try_get("is_read_by_admin")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Persist a message and advance the room's `last_message_at`
///
/// The caller has already rejected blank drafts.
pub async fn insert_message(
    pool: &SqlitePool,
    room_id: RoomId,
    sender: &Identity,
    draft: &MessageDraft,
) -> Result<ChatMessage, sqlx::Error> {
    let (read_by_user, read_by_admin) = match sender.role {
        Role::User => (true, false),
        Role::Admin => (false, true),
    };
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    // Write first so the transaction takes the write lock up front.
    let message_id: MessageId = sqlx::query_scalar(
        r#"
        INSERT INTO chat_messages
            (room_id, sender_id, message_type, content, file_url,
             is_read_by_user, is_read_by_admin, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(room_id)
    .bind(sender.id)
    .bind(draft.message_type.as_str())
    .bind(&draft.content)
    .bind(draft.attachment())
    .bind(read_by_user)
    .bind(read_by_admin)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let last_message_at: DateTime<Utc> =
        sqlx::query_scalar("SELECT last_message_at FROM chat_rooms WHERE id = ?")
            .bind(room_id)
            .fetch_one(&mut *tx)
            .await?;

    let created_at = now.max(last_message_at);
    if created_at != now {
        sqlx::query("UPDATE chat_messages SET created_at = ?, updated_at = ? WHERE id = ?")
            .bind(created_at)
            .bind(created_at)
            .bind(message_id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("UPDATE chat_rooms SET last_message_at = ? WHERE id = ?")
        .bind(created_at)
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(ChatMessage {
        id: message_id,
        room_id,
        sender: sender.clone(),
        message_type: draft.message_type,
        message_type_display: draft.message_type.label().to_string(),
        content: draft.content.clone(),
        file_url: draft.attachment().map(str::to_string),
        is_read_by_user: read_by_user,
        is_read_by_admin: read_by_admin,
        created_at,
        updated_at: created_at,
    })
}

/// Set the reader's read flag on the listed messages of `room_id`
///
/// Returns the number of rows that changed.
pub async fn mark_read(
    pool: &SqlitePool,
    room_id: RoomId,
    reader_role: Role,
    message_ids: &[MessageId],
) -> Result<u64, sqlx::Error> {
    if message_ids.is_empty() {
        return Ok(0);
    }

    let column = match reader_role {
        Role::User => "is_read_by_user",
        Role::Admin => "is_read_by_admin",
    };

    let mut ids = message_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    // One bound JSON array, however many ids the caller sent.
    let ids = serde_json::to_string(&ids).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    let result = sqlx::query(&format!(
        r#"
        UPDATE chat_messages SET {column} = 1
        WHERE room_id = ? AND {column} = 0
          AND id IN (SELECT value FROM json_each(?))
        "#
    ))
    .bind(room_id)
    .bind(ids)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// One page of a room's history in ascending id order
pub async fn list_messages(
    pool: &SqlitePool,
    room_id: RoomId,
    pagination: Pagination,
) -> Result<MessagePage, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE room_id = ?")
        .bind(room_id)
        .fetch_one(pool)
        .await?;

    let rows = sqlx::query(&format!(
        "{} WHERE m.room_id = ? ORDER BY m.id ASC LIMIT ? OFFSET ?",
        MESSAGE_SELECT
    ))
    .bind(room_id)
    .bind(pagination.page_size)
    .bind(pagination.offset())
    .fetch_all(pool)
    .await?;

    let messages = rows
        .iter()
        .map(message_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MessagePage {
        messages,
        has_more: total > pagination.offset().saturating_add(pagination.page_size),
    })
}

/// The newest `limit` messages of a room, oldest first
pub async fn latest_messages(
    pool: &SqlitePool,
    room_id: RoomId,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query(&format!(
        "{} WHERE m.room_id = ? ORDER BY m.id DESC LIMIT ?",
        MESSAGE_SELECT
    ))
    .bind(room_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut messages = rows
        .iter()
        .map(message_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    messages.reverse();

    Ok(messages)
}

/// Preview of the newest message in a room
pub async fn last_message_preview(
    pool: &SqlitePool,
    room_id: RoomId,
) -> Result<Option<LastMessagePreview>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT m.content, m.created_at, u.username
        FROM chat_messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.room_id = ?
        ORDER BY m.id DESC
        LIMIT 1
        "#,
    )
    .bind(room_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => Ok(Some(LastMessagePreview {
            content: row.try_get("content")?,
            sender: row.try_get("username")?,
            created_at: row.try_get("created_at")?,
        })),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, page_size: Option<i64>) -> PageQuery {
        PageQuery { page, page_size }
    }

    #[test]
    fn test_pagination_defaults() {
        let pagination = PageLimits::default().resolve(PageQuery::default());
        assert_eq!(pagination, Pagination { page: 1, page_size: 20 });
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps_non_positive() {
        let limits = PageLimits::default();
        assert_eq!(
            limits.resolve(query(Some(0), Some(0))),
            Pagination { page: 1, page_size: 1 }
        );
        assert_eq!(
            limits.resolve(query(Some(-3), Some(-10))),
            Pagination { page: 1, page_size: 1 }
        );
    }

    #[test]
    fn test_pagination_clamps_oversized_page() {
        let limits = PageLimits {
            default_page_size: 10,
            max_page_size: 50,
        };
        let pagination = limits.resolve(query(Some(3), Some(500)));
        assert_eq!(pagination, Pagination { page: 3, page_size: 50 });
        assert_eq!(pagination.offset(), 100);
    }

    #[test]
    fn test_offset_does_not_overflow() {
        let pagination = PageLimits::default().resolve(query(Some(i64::MAX), Some(100)));
        assert_eq!(pagination.offset(), i64::MAX);
    }
}
