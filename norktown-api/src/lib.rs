//! # Norktown Web Server Library
//!
//! This library provides the Norktown Car Sales web application: a small
//! server-rendered CRUD site where people register, log in via a session
//! cookie, and the administrator attaches vehicles to person records.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `pages`: Inline HTML rendering
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod routes;
