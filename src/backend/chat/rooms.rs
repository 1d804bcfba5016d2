/**
 * Room Persistence
 *
 * This module implements the database side of the room lifecycle:
 * find-or-create, admin assignment with its audit record, soft-close and
 * listing.
 *
 * # Uniqueness
 *
 * Two partial unique indexes allow at most one *active* room per
 * `(user, field)` and, for rooms without a field, per `(user, room_type)`.
 * Creation inserts with `ON CONFLICT DO NOTHING` and then re-reads the
 * active room, so concurrent "start chat" requests converge on one row.
 */

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::shared::chat::{
    ChatRoom, ChatRoomAssignment, FieldId, RoomId, RoomType, UserId,
};

const ROOM_COLUMNS: &str =
    "id, user_id, admin_id, field_id, room_type, is_active, created_at, last_message_at";

fn room_from_row(row: &SqliteRow) -> Result<ChatRoom, sqlx::Error> {
    let room_type: String = row.try_get("room_type")?;
    let room_type = room_type
        .parse::<RoomType>()
        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;

    Ok(ChatRoom {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        admin_id: row.try_get("admin_id")?,
        field_id: row.try_get("field_id")?,
        room_type,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        last_message_at: row.try_get("last_message_at")?,
    })
}

fn assignment_from_row(row: &SqliteRow) -> Result<ChatRoomAssignment, sqlx::Error> {
    Ok(ChatRoomAssignment {
        id: row.try_get("id")?,
        room_id: row.try_get("room_id")?,
        admin_id: row.try_get("admin_id")?,
        assigned_by: row.try_get("assigned_by")?,
        assigned_at: row.try_get("assigned_at")?,
        is_active: row.try_get("is_active")?,
    })
}

/// Get room by ID
pub async fn get_room(pool: &SqlitePool, room_id: RoomId) -> Result<Option<ChatRoom>, sqlx::Error> {
    let row = sqlx::query(&format!("SELECT {} FROM chat_rooms WHERE id = ?", ROOM_COLUMNS))
        .bind(room_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(room_from_row).transpose()
}

/// Find the active room for a `(user, field)` key, or `(user, room_type)`
/// when no field is given
pub async fn find_active_room(
    pool: &SqlitePool,
    user_id: UserId,
    field_id: Option<FieldId>,
    room_type: RoomType,
) -> Result<Option<ChatRoom>, sqlx::Error> {
    let row = match field_id {
        Some(field_id) => {
            sqlx::query(&format!(
                "SELECT {} FROM chat_rooms WHERE user_id = ? AND field_id = ? AND is_active = 1",
                ROOM_COLUMNS
            ))
            .bind(user_id)
            .bind(field_id)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query(&format!(
                "SELECT {} FROM chat_rooms \
                 WHERE user_id = ? AND room_type = ? AND field_id IS NULL AND is_active = 1",
                ROOM_COLUMNS
            ))
            .bind(user_id)
            .bind(room_type.as_str())
            .fetch_optional(pool)
            .await?
        }
    };

    row.as_ref().map(room_from_row).transpose()
}

/// Insert a new active room unless one already holds the key
///
/// Returns `true` when this call created the row.
async fn insert_room_if_absent(
    pool: &SqlitePool,
    user_id: UserId,
    field_id: Option<FieldId>,
    room_type: RoomType,
) -> Result<bool, sqlx::Error> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO chat_rooms (user_id, admin_id, field_id, room_type, is_active, created_at, last_message_at)
        VALUES (?, NULL, ?, ?, 1, ?, ?)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(field_id)
    .bind(room_type.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Return the active room for the key, creating it if needed
///
/// The boolean is `true` when the room was created by this call.
pub async fn find_or_create_room(
    pool: &SqlitePool,
    user_id: UserId,
    field_id: Option<FieldId>,
    room_type: RoomType,
) -> Result<(ChatRoom, bool), sqlx::Error> {
    if let Some(room) = find_active_room(pool, user_id, field_id, room_type).await? {
        return Ok((room, false));
    }

    let created = insert_room_if_absent(pool, user_id, field_id, room_type).await?;

    // Either our insert or a concurrent one holds the key now.
    let room = find_active_room(pool, user_id, field_id, room_type)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    if created {
        tracing::info!(
            "[Chat] Created room {} for user {} ({})",
            room.id,
            user_id,
            room_type.as_str()
        );
    }

    Ok((room, created))
}

/// Point the room at `admin_id` and append an assignment record
///
/// Both writes commit together.
pub async fn assign_admin(
    pool: &SqlitePool,
    room_id: RoomId,
    admin_id: UserId,
    assigned_by: UserId,
) -> Result<ChatRoomAssignment, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE chat_rooms SET admin_id = ? WHERE id = ?")
        .bind(admin_id)
        .bind(room_id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query(
        r#"
        INSERT INTO chat_room_assignments (room_id, admin_id, assigned_by, assigned_at, is_active)
        VALUES (?, ?, ?, ?, 1)
        RETURNING id, room_id, admin_id, assigned_by, assigned_at, is_active
        "#,
    )
    .bind(room_id)
    .bind(admin_id)
    .bind(assigned_by)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    let assignment = assignment_from_row(&row)?;

    tx.commit().await?;

    Ok(assignment)
}

/// Assignment history of a room, newest first
pub async fn list_assignments(
    pool: &SqlitePool,
    room_id: RoomId,
) -> Result<Vec<ChatRoomAssignment>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, room_id, admin_id, assigned_by, assigned_at, is_active
        FROM chat_room_assignments
        WHERE room_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(room_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(assignment_from_row).collect()
}

/// Soft-close a room. Closing twice is harmless.
pub async fn deactivate_room(pool: &SqlitePool, room_id: RoomId) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE chat_rooms SET is_active = 0 WHERE id = ?")
        .bind(room_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Rooms owned by `owner`, or every room when `owner` is `None`
///
/// Ordered by most recent activity.
pub async fn list_rooms(
    pool: &SqlitePool,
    owner: Option<UserId>,
) -> Result<Vec<ChatRoom>, sqlx::Error> {
    let rows = match owner {
        Some(user_id) => {
            sqlx::query(&format!("SELECT {} FROM chat_rooms WHERE user_id = ?", ROOM_COLUMNS))
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
        None => {
            sqlx::query(&format!("SELECT {} FROM chat_rooms", ROOM_COLUMNS))
                .fetch_all(pool)
                .await?
        }
    };

    let mut rooms = rows
        .iter()
        .map(room_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    // Timestamps are stored as text, so order on the decoded values.
    rooms.sort_by(|a, b| {
        b.last_message_at
            .cmp(&a.last_message_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    Ok(rooms)
}
