/// Application state and router builder
///
/// This module defines the shared application state and provides a function
/// to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use norktown_api::{app::{build_router, AppState}, config::Config};
/// use norktown_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    routing::get,
    Router,
};
use norktown_shared::auth::middleware::{load_session, require_admin};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime in seconds, for cookie Max-Age values
    pub fn session_ttl_seconds(&self) -> i64 {
        self.config.session.ttl_seconds()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET  /                                    index: all persons (public)
/// GET  /person/:id                          person detail (public)
/// GET  /register, POST /register            registration (public)
/// GET  /login,    POST /login               login (public)
/// GET  /logout                              logout (public)
/// GET  /edit/:id, POST /edit/:id            vehicle form (admin only)
/// GET  /deletevehicle/:vehicle_id/:person_id  delete vehicle (admin only)
/// GET  /health                              health check (public)
/// ```
///
/// # Middleware Stack
///
/// Session loading runs on every request so handlers can always extract a
/// `SessionContext`; the admin guard wraps only the two admin routes.
/// Request tracing and security headers sit at the outer edge.
pub fn build_router(state: AppState) -> Router {
    // Admin routes (403 for anyone but the administrator)
    let admin_routes = Router::new()
        .route(
            "/edit/:id",
            get(routes::vehicles::edit_form).post(routes::vehicles::add_vehicle),
        )
        .route(
            "/deletevehicle/:vehicle_id/:person_id",
            get(routes::vehicles::delete_vehicle),
        )
        .route_layer(axum::middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(routes::persons::index))
        .route("/person/:id", get(routes::persons::show_person))
        .route(
            "/register",
            get(routes::auth::register_page).post(routes::auth::register),
        )
        .route(
            "/login",
            get(routes::auth::login_page).post(routes::auth::login),
        )
        .route("/logout", get(routes::auth::logout))
        .route("/health", get(routes::health::health_check))
        .merge(admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.db.clone(),
            load_session,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}
