/**
 * Database Bootstrap
 *
 * Opens the SQLite pool described by `AppConfig` and runs the embedded
 * migrations from `migrations/`.
 *
 * File databases are created on first start and use WAL journaling with a
 * busy timeout, so concurrent writers wait instead of failing. In-memory
 * databases (`sqlite::memory:`) are pinned to a single connection that is
 * never recycled, otherwise every new connection would see an empty
 * database.
 */

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Open the connection pool and bring the schema up to date
pub async fn connect_database(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!("[Server] Connecting to database...");

    let in_memory = is_in_memory(database_url);

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options.connect_with(options).await?;
    tracing::info!("[Server] Database connection pool created");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("[Server] Database migrations completed");

    Ok(pool)
}
