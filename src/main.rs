//! Expense bot - chat-driven expense submission and approval
//!
//! Collects expense claims from users over direct messages, stores them,
//! and lets approvers mark them paid or rejected from the shared channel.

mod api;
mod chat;
mod config;
mod db;
mod format;
mod messages;
mod runtime;
mod signals;
mod state_machine;

use api::{create_router, AppState};
use chat::MattermostClient;
use config::{Config, ConfigHandle};
use db::Database;
use runtime::DatabaseStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expense_bot=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;
    tracing::info!(?config, "Configuration loaded");
    let port = config.port;
    let db_path = config.db_path.clone();
    let config = ConfigHandle::new(config);

    // Ensure database directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    tracing::info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path)?;

    let store = Arc::new(DatabaseStore::new(db));
    let messenger = Arc::new(MattermostClient::new(config.clone())?);
    let state = AppState::new(store, messenger, config.clone());

    signals::spawn_reload_on_sighup(config)?;
    let shutdown = signals::shutdown_signal()?;

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Expense bot listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
