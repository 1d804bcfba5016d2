/**
 * User Lookup
 *
 * The identity provider owns user accounts. Chat only reads the projection
 * it needs (`id`, `username`, `full_name`, `role`) from the `users` table.
 */

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::shared::chat::{Identity, Role, UserId};

pub(crate) fn identity_from_row(row: &SqliteRow) -> Result<Identity, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|e| sqlx::Error::Decode(e.to_string().into()))?;

    Ok(Identity {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        full_name: row.try_get("full_name")?,
        role,
    })
}

/// Insert a user row
///
/// Accounts normally arrive from the identity provider; this is used when
/// seeding and in tests.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    full_name: &str,
    role: Role,
) -> Result<Identity, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, full_name, role, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(full_name)
    .bind(role.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(Identity {
        id,
        username: username.to_string(),
        full_name: full_name.to_string(),
        role,
    })
}

/// Get user by ID
pub async fn get_user_by_id(
    pool: &SqlitePool,
    user_id: UserId,
) -> Result<Option<Identity>, sqlx::Error> {
    let row = sqlx::query("SELECT id, username, full_name, role FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(identity_from_row).transpose()
}

/// Get a user by ID only if they hold the admin role
pub async fn get_admin_by_id(
    pool: &SqlitePool,
    user_id: UserId,
) -> Result<Option<Identity>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, username, full_name, role FROM users WHERE id = ? AND role = 'admin'",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(identity_from_row).transpose()
}
