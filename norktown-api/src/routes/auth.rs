/// Authentication endpoints
///
/// Registration, session login, and logout. These are HTML form endpoints:
/// outcomes are reported as flash messages over redirects, never as JSON.
///
/// # Endpoints
///
/// - `GET  /register` - Registration form
/// - `POST /register` - Create a person (duplicate email bounces to login)
/// - `GET  /login` - Login form
/// - `POST /login` - Verify credentials and install the session cookie
/// - `GET  /logout` - Drop the session and expire the cookie

use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::{Duration, Utc};
use norktown_shared::auth::middleware::{clear_session_cookie, session_cookie, SessionContext};
use norktown_shared::auth::password::{hash_password, verify_password};
use norktown_shared::auth::token::generate_session_token;
use norktown_shared::models::person::{CreatePerson, Person};
use norktown_shared::models::session::{CreateSession, Session};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::{
    app::AppState,
    error::AppResult,
    pages,
    routes::{flash_redirect, take_flash},
};

/// Registration form payload
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterForm {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login form payload
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Pulls the first human-readable message out of a validation failure
fn first_validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid form input".to_string())
}

/// Registration form page handler
pub async fn register_page(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Html<String>> {
    let flash = take_flash(&state, &ctx).await?;
    Ok(pages::register_page(flash.as_deref(), ctx.is_authenticated()))
}

/// Registration handler
///
/// If the email is already registered, flashes a hint and redirects to the
/// login page without creating a row. Otherwise hashes the password with
/// Argon2id, inserts the person, and redirects to the index.
pub async fn register(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    if let Err(errors) = form.validate() {
        let message = first_validation_message(&errors);
        return flash_redirect(&state, &ctx, &message, "/register").await;
    }

    if Person::find_by_email(&state.db, &form.email).await?.is_some() {
        return flash_redirect(
            &state,
            &ctx,
            "You've already signed up with that email, log in instead!",
            "/login",
        )
        .await;
    }

    let password_hash = hash_password(&form.password)?;

    let person = Person::create(
        &state.db,
        CreatePerson {
            email: form.email,
            name: form.name,
            password_hash,
        },
    )
    .await?;

    tracing::info!(person_id = person.id, "Registered new person");

    Ok(Redirect::to("/").into_response())
}

/// Login form page handler
pub async fn login_page(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Html<String>> {
    let flash = take_flash(&state, &ctx).await?;
    Ok(pages::login_page(flash.as_deref(), ctx.is_authenticated()))
}

/// Login handler
///
/// Verifies email and password, then rotates the session: whatever session
/// the visitor carried (anonymous or a previous login) is deleted and a
/// fresh token bound to the person is issued.
pub async fn login(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let person = match Person::find_by_email(&state.db, &form.email).await? {
        Some(person) => person,
        None => {
            return flash_redirect(
                &state,
                &ctx,
                "That email does not exist, please try again.",
                "/login",
            )
            .await;
        }
    };

    if !verify_password(&form.password, &person.password_hash)? {
        return flash_redirect(
            &state,
            &ctx,
            "Password incorrect, please try again.",
            "/login",
        )
        .await;
    }

    // Rotate the session on privilege change
    if let Some(old) = &ctx.session {
        Session::delete(&state.db, old.id).await?;
    }

    let (token, token_hash) = generate_session_token();
    Session::create(
        &state.db,
        CreateSession {
            person_id: Some(person.id),
            token_hash,
            flash: None,
            expires_at: Utc::now() + Duration::seconds(state.session_ttl_seconds()),
        },
    )
    .await?;

    tracing::info!(person_id = person.id, "Person logged in");

    let cookie = session_cookie(&token, state.session_ttl_seconds());
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to("/"),
    )
        .into_response())
}

/// Logout handler
///
/// Deletes the session row and expires the cookie; safe to hit while
/// logged out.
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Response> {
    if let Some(session) = &ctx.session {
        Session::delete(&state.db, session.id).await?;
    }

    Ok((
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to("/"),
    )
        .into_response())
}
