//! Client CRUD and the satisfaction summary.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use confeitaria_core::{
    validation::validate_new_client, Client, ClientStatus, NewClient, StatusSummary,
};
use serde::Deserialize;
use tracing::info;

use super::required;
use crate::error::{ApiError, ApiResult};
use crate::session::RequireUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/clients", get(list).post(create))
        // Registered before `{id}` so the literal segment wins.
        .route("/api/clients/status-summary", get(status_summary))
        .route("/api/clients/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
}

impl ClientRequest {
    /// Missing status means "Needs improvement".
    fn into_new_client(self) -> Result<NewClient, ApiError> {
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse::<ClientStatus>()?,
            None => ClientStatus::default(),
        };

        Ok(validate_new_client(NewClient {
            name: required(self.name, "name")?,
            email: required(self.email, "email")?,
            status,
        })?)
    }
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.db.clients().list(user.user_id).await?))
}

async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<ClientRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let Json(req) = body?;
    let new_client = req.into_new_client()?;

    let client = state.db.clients().insert(user.user_id, &new_client).await?;
    info!(user_id = user.user_id, client_id = client.id, "Client created");

    Ok((StatusCode::CREATED, Json(client)))
}

async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ClientRequest>, JsonRejection>,
) -> ApiResult<Json<Client>> {
    let Path(id) = path?;
    let Json(req) = body?;
    let changes = req.into_new_client()?;

    Ok(Json(state.db.clients().update(user.user_id, id, &changes).await?))
}

async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.db.clients().delete(user.user_id, id).await?;
    info!(user_id = user.user_id, client_id = id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn status_summary(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<StatusSummary>> {
    Ok(Json(state.db.reports().client_status_summary(user.user_id).await?))
}
