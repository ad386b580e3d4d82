//! Health checks.

use axum::{extract::State, http::StatusCode, routing::get, Router};
use confeitaria_db::migrations::migration_status;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
}

async fn health() -> &'static str {
    "ok"
}

/// Ready once the database answers and every bundled migration is applied.
async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if !state.db.health_check().await {
        tracing::warn!("Readiness check failed: database unreachable");
        return (StatusCode::SERVICE_UNAVAILABLE, "database unavailable");
    }

    match migration_status(state.db.pool()).await {
        Ok((total, applied)) if applied >= total => (StatusCode::OK, "ok"),
        Ok((total, applied)) => {
            tracing::warn!(total, applied, "Readiness check failed: migrations pending");
            (StatusCode::SERVICE_UNAVAILABLE, "migrations pending")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed: migration status unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, "migrations pending")
        }
    }
}
