//! # Norktown Shared Library
//!
//! This crate contains the data layer and authentication primitives shared by
//! the Norktown Car Sales web application.
//!
//! ## Module Organization
//!
//! - `db`: SQLite connection pool and schema bootstrap
//! - `models`: Database models (Person, Vehicle, Session)
//! - `auth`: Password hashing, session tokens, and session middleware

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Norktown shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
