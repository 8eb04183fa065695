/// Route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `persons`: Index and person detail pages
/// - `auth`: Registration, login, logout
/// - `vehicles`: Admin vehicle form and delete route
/// - `health`: Health check endpoint
///
/// The helpers below implement the one-shot flash pattern shared by the
/// form handlers: a message is written to the session (creating an
/// anonymous session when the visitor has none) and consumed by whichever
/// page renders next.

use axum::{
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use chrono::{Duration, Utc};
use norktown_shared::auth::middleware::{session_cookie, SessionContext};
use norktown_shared::auth::token::generate_session_token;
use norktown_shared::models::session::{CreateSession, Session};

use crate::{app::AppState, error::AppResult};

pub mod auth;
pub mod health;
pub mod persons;
pub mod vehicles;

/// Consumes the pending flash message for this request's session, if any
pub(crate) async fn take_flash(
    state: &AppState,
    ctx: &SessionContext,
) -> AppResult<Option<String>> {
    match &ctx.session {
        Some(session) => Ok(Session::take_flash(&state.db, session.id).await?),
        None => Ok(None),
    }
}

/// Stores a flash message and redirects
///
/// Visitors without a session get an anonymous one so the message survives
/// the redirect; its cookie rides along on the response.
pub(crate) async fn flash_redirect(
    state: &AppState,
    ctx: &SessionContext,
    message: &str,
    location: &str,
) -> AppResult<Response> {
    match &ctx.session {
        Some(session) => {
            Session::set_flash(&state.db, session.id, message).await?;
            Ok(Redirect::to(location).into_response())
        }
        None => {
            let (token, token_hash) = generate_session_token();

            Session::create(
                &state.db,
                CreateSession {
                    person_id: None,
                    token_hash,
                    flash: Some(message.to_string()),
                    expires_at: Utc::now() + Duration::seconds(state.session_ttl_seconds()),
                },
            )
            .await?;

            let cookie = session_cookie(&token, state.session_ttl_seconds());
            Ok((
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to(location),
            )
                .into_response())
        }
    }
}
