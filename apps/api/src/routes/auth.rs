//! Signup, login, logout and the current account.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use confeitaria_core::{
    validation::{validate_email, validate_name, validate_password, validate_plan},
    User,
};
use confeitaria_db::password::{hash_password, verify_password};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

use super::required;
use crate::error::{ApiError, ApiResult};
use crate::session::{log_in, log_out, RequireUser};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid email or password";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/me", get(me))
        .route("/api/me/plan", put(update_plan))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub plan: Option<String>,
}

async fn signup(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let Json(req) = body?;

    let name = validate_name("name", &required(req.name, "name")?)?;
    let email = validate_email(&required(req.email, "email")?)?;
    let password = required(req.password, "password")?;
    validate_password(&password)?;

    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {e}")))??;

    let user = state.db.users().create(&name, &email, &hash).await?;
    log_in(&session, user.id).await?;

    info!(user_id = user.id, "Account created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(req) = body?;

    let email = required(req.email, "email")?.trim().to_lowercase();
    let password = required(req.password, "password")?;

    let Some(user) = state.db.users().get_by_email(&email).await? else {
        warn!("Login rejected: unknown email");
        return Err(ApiError::InvalidCredentials(BAD_CREDENTIALS.to_string()));
    };

    let hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verify task failed: {e}")))?;

    if !verified {
        warn!(user_id = user.id, "Login rejected: wrong password");
        return Err(ApiError::InvalidCredentials(BAD_CREDENTIALS.to_string()));
    }

    log_in(&session, user.id).await?;
    info!(user_id = user.id, "Logged in");
    Ok(Json(user))
}

async fn logout(session: Session) -> ApiResult<StatusCode> {
    log_out(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>, RequireUser(user): RequireUser) -> ApiResult<Json<User>> {
    // A session can outlive its account.
    let account = state
        .db
        .users()
        .get_by_id(user.user_id)
        .await?
        .ok_or_else(ApiError::unauthorized)?;

    Ok(Json(account))
}

async fn update_plan(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(req) = body?;
    let plan = validate_plan(&required(req.plan, "plan")?)?;

    state.db.users().update_plan(user.user_id, &plan).await?;
    info!(user_id = user.user_id, plan = %plan, "Plan changed");

    me(State(state), RequireUser(user)).await
}
