//! # Routes
//!
//! ```text
//! /health                          liveness
//! /health/ready                    database reachable
//! /api/signup, /api/login, /api/logout, /api/me, /api/me/plan
//! /api/clients[/{id}]              owner-scoped CRUD
//! /api/clients/status-summary      satisfaction buckets
//! /api/products[/{id}]             owner-scoped CRUD
//! /api/feedbacks[/{client_id}]     create and list
//! /api/orders/single, /api/orders/multi
//! /api/orders, /api/orders/client/{client_id}, /api/orders/{order_id}
//! /api/reports/sales               per-status totals
//! ```
//!
//! Request bodies use `Option` fields so a missing field is reported as a
//! validation error naming it, rather than a serde message.

use axum::Router;
use confeitaria_core::ValidationError;

use crate::state::AppState;

pub mod auth;
pub mod clients;
pub mod feedbacks;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;

/// All routes, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(clients::routes())
        .merge(products::routes())
        .merge(feedbacks::routes())
        .merge(orders::routes())
        .merge(reports::routes())
}

/// Unwraps a body field or reports it as missing.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}
