/// Schema bootstrap
///
/// Creates the application tables on startup, the same way the development
/// server has always done it: every statement is `CREATE ... IF NOT EXISTS`,
/// so calling this against an existing database is a no-op.
///
/// # Tables
///
/// - `person`: registered accounts (unique email, Argon2id password hash)
/// - `vehicle`: child rows owned by a person, cascade-deleted with it
/// - `session`: server-side login sessions keyed by hashed cookie token

use sqlx::SqlitePool;
use tracing::info;

const CREATE_PERSON: &str = r#"
CREATE TABLE IF NOT EXISTS person (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMP NOT NULL
)
"#;

const CREATE_VEHICLE: &str = r#"
CREATE TABLE IF NOT EXISTS vehicle (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id INTEGER NOT NULL REFERENCES person(id) ON DELETE CASCADE,
    name      TEXT NOT NULL,
    color     TEXT NOT NULL,
    sale      BOOLEAN NOT NULL DEFAULT FALSE
)
"#;

const CREATE_VEHICLE_OWNER_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_vehicle_person_id ON vehicle(person_id)
"#;

const CREATE_SESSION: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id  INTEGER REFERENCES person(id) ON DELETE CASCADE,
    token_hash TEXT NOT NULL UNIQUE,
    flash      TEXT,
    created_at TIMESTAMP NOT NULL,
    expires_at TIMESTAMP NOT NULL
)
"#;

/// Creates all application tables if they do not exist yet
///
/// # Errors
///
/// Returns an error if any DDL statement fails to execute.
///
/// # Example
///
/// ```no_run
/// use norktown_shared::db::{pool::{create_pool, DatabaseConfig}, schema::init_schema};
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool(DatabaseConfig {
///     url: "sqlite:norktown.db?mode=rwc".to_string(),
///     ..Default::default()
/// })
/// .await?;
///
/// init_schema(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [
        CREATE_PERSON,
        CREATE_VEHICLE,
        CREATE_VEHICLE_OWNER_INDEX,
        CREATE_SESSION,
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::{create_pool, DatabaseConfig};

    async fn memory_pool() -> SqlitePool {
        create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            ..Default::default()
        })
        .await
        .expect("pool should be created")
    }

    #[tokio::test]
    async fn test_init_schema_creates_tables() {
        let pool = memory_pool().await;
        init_schema(&pool).await.expect("schema init should succeed");

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('person', 'vehicle', 'session')",
        )
        .fetch_one(&pool)
        .await
        .expect("query should succeed");

        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = memory_pool().await;
        init_schema(&pool).await.expect("first init should succeed");
        init_schema(&pool).await.expect("second init should succeed");
    }
}
