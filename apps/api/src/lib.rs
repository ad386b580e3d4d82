//! # Confeitaria API
//!
//! HTTP/JSON server for the order-management backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           API Server                                    │
//! │                                                                         │
//! │  request ──► TraceLayer ──► SessionManagerLayer ──► Router              │
//! │                                                        │                │
//! │              ┌──────────────┬──────────────┬───────────┴──┐             │
//! │              ▼              ▼              ▼              ▼             │
//! │          auth.rs      clients.rs     orders.rs      reports.rs  ...     │
//! │              │              │              │              │             │
//! │              └──────────────┴──────┬───────┴──────────────┘             │
//! │                                    ▼                                    │
//! │                     AppState { Database, OrderWorkflow }                │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                           SQLite (WAL, pooled)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (or `.env`):
//! - `CONFEITARIA_HOST` - Bind address (default: 0.0.0.0)
//! - `CONFEITARIA_PORT` - HTTP port (default: 3000)
//! - `CONFEITARIA_DB_PATH` - SQLite file (default: ./confeitaria.db)
//! - `CONFEITARIA_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `CONFEITARIA_SECURE_COOKIES` - `Secure` session cookie (default: false)
//! - `CONFEITARIA_SESSION_TTL_SECS` - Inactivity expiry (default: 604800)
//! - `RUST_LOG` - Log filter

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

// Re-exports
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Builds the full application: routes, sessions and request tracing.
pub fn build_app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    routes::router()
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
