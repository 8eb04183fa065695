/// Database utilities
///
/// This module provides the SQLite connection pool and the schema bootstrap
/// that creates the application tables on startup.
///
/// # Modules
///
/// - `pool`: Connection pool creation and health checks
/// - `schema`: `CREATE TABLE IF NOT EXISTS` bootstrap for all tables

pub mod pool;
pub mod schema;
