//! # Confeitaria API Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  browser ───► HTTP (3000) ───► axum routes ───► confeitaria-db          │
//! │                    │                                  │                 │
//! │                    └── session cookie ──► tower_sessions table          │
//! │                                                       │                 │
//! │                                             SQLite file (WAL)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use confeitaria_api::{build_app, session::session_layer, AppState, ServerConfig};
use confeitaria_db::Database;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tower_sessions_sqlx_store::SqliteStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment may already be set.
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,confeitaria=debug,sqlx=warn,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    info!("Starting Confeitaria API server...");

    let config = ServerConfig::load()?;
    let addr = config.bind_addr()?;
    info!(
        %addr,
        db_path = %config.db_path.display(),
        max_connections = config.db_max_connections,
        "Configuration loaded"
    );

    // Migrations run on connect
    let db = Database::new(config.db_config()).await?;
    info!("Database ready");

    let store = SqliteStore::new(db.pool().clone());
    store.migrate().await?;

    let app = build_app(AppState::new(db.clone()), session_layer(store, &config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
