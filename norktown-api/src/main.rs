//! # Norktown Car Sales
//!
//! Server-rendered CRUD web application: people register and log in via a
//! session cookie, and the administrator attaches vehicles to person
//! records through HTML forms.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p norktown-api
//! ```

use chrono::Utc;
use norktown_api::{
    app::{build_router, AppState},
    config::Config,
};
use norktown_shared::db::pool::{create_pool, DatabaseConfig};
use norktown_shared::db::schema::init_schema;
use norktown_shared::models::session::Session;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "norktown_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Norktown Car Sales v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    init_schema(&pool).await?;

    let purged = Session::purge_expired(&pool, Utc::now()).await?;
    if purged > 0 {
        tracing::info!(purged, "Purged expired sessions");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown signal received, exiting...");
    }
}
