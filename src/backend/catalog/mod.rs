//! Field Catalog
//!
//! Read-only view of the sports fields a room may be attached to. The
//! catalog itself is managed elsewhere; chat only checks that a field exists.

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::shared::chat::FieldId;

/// A bookable sports field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub field_type: String,
    pub location: String,
}

/// Get field by ID
pub async fn get_field_by_id(
    pool: &SqlitePool,
    field_id: FieldId,
) -> Result<Option<Field>, sqlx::Error> {
    let row = sqlx::query("SELECT id, name, field_type, location FROM fields WHERE id = ?")
        .bind(field_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(Some(Field {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            field_type: row.try_get("field_type")?,
            location: row.try_get("location")?,
        })),
        None => Ok(None),
    }
}

/// Insert a field row (seeding and tests)
pub async fn create_field(
    pool: &SqlitePool,
    name: &str,
    field_type: &str,
    location: &str,
) -> Result<Field, sqlx::Error> {
    let id: FieldId = sqlx::query_scalar(
        r#"
        INSERT INTO fields (name, field_type, location)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(field_type)
    .bind(location)
    .fetch_one(pool)
    .await?;

    Ok(Field {
        id,
        name: name.to_string(),
        field_type: field_type.to_string(),
        location: location.to_string(),
    })
}
