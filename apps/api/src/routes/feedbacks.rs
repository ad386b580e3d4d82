//! Client feedbacks.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use confeitaria_core::{validation::validate_new_feedback, Feedback, FeedbackView, NewFeedback};
use serde::Deserialize;
use tracing::info;

use super::required;
use crate::error::ApiResult;
use crate::session::RequireUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/feedbacks", get(list).post(create))
        .route("/api/feedbacks/{client_id}", get(list_for_client))
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub client_id: Option<i64>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
    pub photo: Option<String>,
}

async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Feedback>)> {
    let Json(req) = body?;

    let new_feedback = validate_new_feedback(NewFeedback {
        client_id: required(req.client_id, "client_id")?,
        rating: required(req.rating, "rating")?,
        comment: req.comment.unwrap_or_default(),
        photo: req.photo,
    })?;

    let feedback = state.db.feedbacks().insert(user.user_id, &new_feedback).await?;
    info!(
        user_id = user.user_id,
        client_id = feedback.client_id,
        rating = feedback.rating,
        "Feedback recorded"
    );

    Ok((StatusCode::CREATED, Json(feedback)))
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<Vec<FeedbackView>>> {
    Ok(Json(state.db.feedbacks().list(user.user_id).await?))
}

async fn list_for_client(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<FeedbackView>>> {
    let Path(client_id) = path?;
    Ok(Json(
        state
            .db
            .feedbacks()
            .list_for_client(user.user_id, client_id)
            .await?,
    ))
}
