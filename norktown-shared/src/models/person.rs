/// Person model and database operations
///
/// A person is a registered account. People own vehicles; deleting a person
/// cascades to its vehicle and session rows at the schema level.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE person (
///     id            INTEGER PRIMARY KEY AUTOINCREMENT,
///     email         TEXT NOT NULL UNIQUE,
///     name          TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     created_at    TIMESTAMP NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Person model representing a registered account
///
/// The first registered person (id 1) is the administrator. Passwords are
/// stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    /// Row id; id 1 is the administrator
    pub id: i64,

    /// Email address, unique across all people
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash (PHC string format)
    pub password_hash: String,

    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new person
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePerson {
    /// Email address (must not already be registered)
    pub email: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl Person {
    /// Creates a new person in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database is unreachable.
    pub async fn create(pool: &SqlitePool, data: CreatePerson) -> Result<Self, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            INSERT INTO person (email, name, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, email, name, password_hash, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(person)
    }

    /// Finds a person by id
    ///
    /// Returns `None` if no such row exists.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM person
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Finds a person by email address
    ///
    /// Used by registration (duplicate check) and login.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let person = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM person
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(person)
    }

    /// Lists all people ordered by id
    ///
    /// Backs the index page.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let people = sqlx::query_as::<_, Person>(
            r#"
            SELECT id, email, name, password_hash, created_at
            FROM person
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(people)
    }

    /// Deletes a person by id
    ///
    /// Vehicle and session rows owned by the person are removed by the
    /// `ON DELETE CASCADE` foreign keys.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM person WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the total number of registered people
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM person")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_person_struct() {
        let data = CreatePerson {
            email: "test@test.com".to_string(),
            name: "test".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        };

        assert_eq!(data.email, "test@test.com");
        assert_eq!(data.name, "test");
    }

    // Database-backed tests live in tests/model_tests.rs
}
