/// Middleware modules for the web server
///
/// Session loading and the admin guard live in `norktown_shared::auth`;
/// this module holds middleware specific to serving HTML:
/// - Security headers

pub mod security;
