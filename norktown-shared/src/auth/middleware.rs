/// Session middleware for Axum
///
/// Two middleware functions cover the whole auth story:
///
/// - [`load_session`] runs on every request. It parses the session cookie,
///   looks up the live session row and its person, and inserts a
///   [`SessionContext`] into request extensions. Requests without a valid
///   cookie get an anonymous context.
/// - [`require_admin`] wraps the admin-only routes. Anything other than a
///   logged-in administrator gets a 403.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use norktown_shared::auth::middleware::{load_session, require_admin, SessionContext};
/// use sqlx::SqlitePool;
///
/// async fn admin_page(ctx: axum::Extension<SessionContext>) -> String {
///     format!("admin: {:?}", ctx.person.as_ref().map(|p| p.id))
/// }
///
/// # fn example(pool: SqlitePool) {
/// let app: Router = Router::new()
///     .route("/admin", get(admin_page))
///     .route_layer(middleware::from_fn(require_admin))
///     .layer(middleware::from_fn_with_state(pool.clone(), load_session));
/// # }
/// ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{person::Person, session::Session};

use super::token::hash_session_token;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "norktown_session";

/// Person id of the administrator account
///
/// The first account to register gets id 1 and with it the admin role.
pub const ADMIN_PERSON_ID: i64 = 1;

/// Session context added to request extensions
///
/// Always present after [`load_session`] has run; both fields are `None`
/// for anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// The live session row, if the request carried a valid cookie
    pub session: Option<Session>,

    /// The logged-in person, if the session is bound to one
    pub person: Option<Person>,
}

impl SessionContext {
    /// Whether the request belongs to a logged-in person
    pub fn is_authenticated(&self) -> bool {
        self.person.is_some()
    }

    /// Whether the request belongs to the administrator
    pub fn is_admin(&self) -> bool {
        self.person
            .as_ref()
            .map(|person| person.id == ADMIN_PERSON_ID)
            .unwrap_or(false)
    }
}

/// Error type for the session middleware
#[derive(Debug)]
pub enum AuthError {
    /// Route requires the administrator (403)
    Forbidden,

    /// Session lookup failed (500)
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden").into_response(),
            AuthError::DatabaseError(msg) => {
                tracing::error!("Session lookup failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Extracts the session token from a Cookie header value
///
/// The header is a `; `-separated list of `name=value` pairs; returns the
/// value paired with [`SESSION_COOKIE`], if any.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// Builds the Set-Cookie value that installs a session token
///
/// HttpOnly keeps the token away from page scripts; SameSite=Lax matches
/// the link-driven navigation of a server-rendered site.
pub fn session_cookie(token: &str, max_age_seconds: i64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_seconds
    )
}

/// Builds the Set-Cookie value that expires the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Session loading middleware
///
/// Runs on every request. Never rejects: an invalid, expired, or missing
/// cookie simply yields an anonymous [`SessionContext`].
///
/// # Errors
///
/// Returns 500 if the session or person lookup fails at the database.
pub async fn load_session(
    State(pool): State<SqlitePool>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie_header);

    let mut ctx = SessionContext::default();

    if let Some(token) = token {
        let token_hash = hash_session_token(token);

        let session = Session::find_live_by_token_hash(&pool, &token_hash, Utc::now())
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        if let Some(session) = session {
            if let Some(person_id) = session.person_id {
                ctx.person = Person::find_by_id(&pool, person_id)
                    .await
                    .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
            }
            ctx.session = Some(session);
        }
    }

    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}

/// Admin guard middleware
///
/// Must run after [`load_session`]. Returns 403 unless the request belongs
/// to the administrator account.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthError> {
    let is_admin = req
        .extensions()
        .get::<SessionContext>()
        .map(SessionContext::is_admin)
        .unwrap_or(false);

    if !is_admin {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_cookie_header() {
        let header = format!("other=1; {}=abc123; another=2", SESSION_COOKIE);
        assert_eq!(token_from_cookie_header(&header), Some("abc123"));
    }

    #[test]
    fn test_token_from_cookie_header_missing() {
        assert_eq!(token_from_cookie_header("other=1; another=2"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }

    #[test]
    fn test_token_from_cookie_header_single_pair() {
        let header = format!("{}=tok", SESSION_COOKIE);
        assert_eq!(token_from_cookie_header(&header), Some("tok"));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok", 3600);
        assert!(cookie.starts_with("norktown_session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_session_context_default_is_anonymous() {
        let ctx = SessionContext::default();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.is_admin());
    }
}
