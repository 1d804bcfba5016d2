/**
 * Unread Counts
 *
 * A message is unread for a viewer when it was sent by the opposite role
 * and the viewer's read flag is still unset:
 *
 * - admin view: sent by a `user`, `is_read_by_admin = 0`
 * - user view: sent by an `admin`, `is_read_by_user = 0`
 *
 * Counts are computed on demand from the store.
 */

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};

use crate::shared::chat::{Identity, Role, RoomId};

/// Sender role and flag column that define "unread" for `viewer`
fn unread_terms(viewer: Role) -> (&'static str, &'static str) {
    match viewer {
        Role::Admin => ("user", "is_read_by_admin"),
        Role::User => ("admin", "is_read_by_user"),
    }
}

/// Unread messages in one room from `viewer`'s side
pub async fn unread_for_room(
    pool: &SqlitePool,
    room_id: RoomId,
    viewer: Role,
) -> Result<i64, sqlx::Error> {
    let (sender_role, flag) = unread_terms(viewer);

    sqlx::query_scalar(&format!(
        r#"
        SELECT COUNT(*)
        FROM chat_messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.room_id = ? AND u.role = ? AND m.{flag} = 0
        "#
    ))
    .bind(room_id)
    .bind(sender_role)
    .fetch_one(pool)
    .await
}

/// Unread counts for every room with at least one unread message
pub async fn unread_by_room(
    pool: &SqlitePool,
    viewer: Role,
) -> Result<HashMap<RoomId, i64>, sqlx::Error> {
    let (sender_role, flag) = unread_terms(viewer);

    let rows = sqlx::query(&format!(
        r#"
        SELECT m.room_id AS room_id, COUNT(*) AS unread
        FROM chat_messages m
        JOIN users u ON u.id = m.sender_id
        WHERE u.role = ? AND m.{flag} = 0
        GROUP BY m.room_id
        "#
    ))
    .bind(sender_role)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| Ok((row.try_get("room_id")?, row.try_get("unread")?)))
        .collect()
}

/// Total unread messages across the rooms that concern `identity`
///
/// Admins count the rooms assigned to them; users count the rooms they own.
pub async fn total_unread_for(pool: &SqlitePool, identity: &Identity) -> Result<i64, sqlx::Error> {
    let (sender_role, flag) = unread_terms(identity.role);
    let room_column = match identity.role {
        Role::Admin => "admin_id",
        Role::User => "user_id",
    };

    sqlx::query_scalar(&format!(
        r#"
        SELECT COUNT(*)
        FROM chat_messages m
        JOIN chat_rooms r ON r.id = m.room_id
        JOIN users u ON u.id = m.sender_id
        WHERE r.{room_column} = ? AND u.role = ? AND m.{flag} = 0
        "#
    ))
    .bind(identity.id)
    .bind(sender_role)
    .fetch_one(pool)
    .await
}
