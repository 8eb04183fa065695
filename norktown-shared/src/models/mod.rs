/// Database models for Norktown
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `person`: Registered accounts; one person owns zero or more vehicles
/// - `vehicle`: Child rows with a fixed name/color catalogue and a sale flag
/// - `session`: Server-side login sessions backing the cookie auth
///
/// # Example
///
/// ```no_run
/// use norktown_shared::db::pool::{create_pool, DatabaseConfig};
/// use norktown_shared::models::person::{CreatePerson, Person};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let person = Person::create(
///     &pool,
///     CreatePerson {
///         email: "user@example.com".to_string(),
///         name: "Jo Example".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod person;
pub mod session;
pub mod vehicle;
