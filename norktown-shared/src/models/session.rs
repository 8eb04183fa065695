/// Session model and database operations
///
/// Sessions back the login cookie. The cookie carries a random token; only
/// the SHA-256 hash of that token is stored here. A session may be anonymous
/// (person_id NULL) so that flash messages survive redirects for visitors
/// who are not logged in yet, and it is promoted to a real login by deleting
/// it and issuing a fresh one bound to the person.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE session (
///     id         INTEGER PRIMARY KEY AUTOINCREMENT,
///     person_id  INTEGER REFERENCES person(id) ON DELETE CASCADE,
///     token_hash TEXT NOT NULL UNIQUE,
///     flash      TEXT,
///     created_at TIMESTAMP NOT NULL,
///     expires_at TIMESTAMP NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Session model representing one login cookie's server-side state
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Row id
    pub id: i64,

    /// The logged-in person, or None for an anonymous session
    pub person_id: Option<i64>,

    /// SHA-256 hex hash of the cookie token
    pub token_hash: String,

    /// Pending one-shot flash message, consumed by the next page render
    pub flash: Option<String>,

    /// When the session was created
    pub created_at: DateTime<Utc>,

    /// When the session stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Input for creating a new session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The logged-in person, or None for an anonymous session
    pub person_id: Option<i64>,

    /// SHA-256 hex hash of the cookie token
    pub token_hash: String,

    /// Optional flash message to carry into the next page render
    pub flash: Option<String>,

    /// When the session stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session in the database
    pub async fn create(pool: &SqlitePool, data: CreateSession) -> Result<Self, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO session (person_id, token_hash, flash, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, person_id, token_hash, flash, created_at, expires_at
            "#,
        )
        .bind(data.person_id)
        .bind(data.token_hash)
        .bind(data.flash)
        .bind(Utc::now())
        .bind(data.expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Finds a live session by its token hash
    ///
    /// An expired row is deleted on sight and treated as absent.
    pub async fn find_live_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, person_id, token_hash, flash, created_at, expires_at
            FROM session
            WHERE token_hash = ?
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;

        match session {
            Some(session) if session.expires_at <= now => {
                Self::delete(pool, session.id).await?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    /// Deletes a session by id
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM session WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stores a flash message on the session
    ///
    /// Overwrites any message that has not been consumed yet; flash storage
    /// is a single slot per session.
    pub async fn set_flash(pool: &SqlitePool, id: i64, message: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE session SET flash = ? WHERE id = ?")
            .bind(message)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Takes the pending flash message, clearing it
    ///
    /// Returns `None` if there is nothing pending; a message is returned at
    /// most once.
    pub async fn take_flash(pool: &SqlitePool, id: i64) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT flash FROM session WHERE id = ?")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        let flash = row.and_then(|(flash,)| flash);

        if flash.is_some() {
            sqlx::query("UPDATE session SET flash = NULL WHERE id = ?")
                .bind(id)
                .execute(pool)
                .await?;
        }

        Ok(flash)
    }

    /// Deletes every expired session
    ///
    /// Run at startup; live traffic already drops expired rows lazily in
    /// [`Session::find_live_by_token_hash`].
    pub async fn purge_expired(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM session WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
