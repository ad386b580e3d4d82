//! # Sessions
//!
//! Cookie sessions via tower-sessions. The session holds only the account
//! id; handlers receive it through [`RequireUser`] and pass it explicitly
//! into every repository and workflow call.
//!
//! ```text
//! POST /api/login ──► verify password ──► cycle id ──► insert user_id
//!                                                         │
//! GET /api/orders ──► RequireUser ──► SessionUser { user_id } ──► db
//!                          │
//!                          └── no user_id ──► 401 UNAUTHORIZED
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::{
    cookie::{time::Duration, SameSite},
    Expiry, Session, SessionManagerLayer, SessionStore,
};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "confeitaria_session";

const USER_ID_KEY: &str = "user_id";

/// Builds the session layer over any store.
///
/// Production passes the SQLite store; tests pass `MemoryStore`.
pub fn session_layer<S>(store: S, config: &ServerConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.session_ttl_secs,
        )))
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The authenticated account of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
}

/// Extractor that rejects requests without a logged-in account.
///
/// ```rust,ignore
/// async fn list(RequireUser(user): RequireUser, State(state): State<AppState>) -> ApiResult<...> {
///     state.db.clients().list(user.user_id).await?
/// }
/// ```
pub struct RequireUser(pub SessionUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or_else(ApiError::unauthorized)?;

        let user_id = session
            .get::<i64>(USER_ID_KEY)
            .await?
            .ok_or_else(ApiError::unauthorized)?;

        Ok(Self(SessionUser { user_id }))
    }
}

/// Starts an authenticated session.
///
/// The session id is rotated so a pre-login cookie cannot be reused.
pub async fn log_in(session: &Session, user_id: i64) -> Result<(), ApiError> {
    session.cycle_id().await?;
    session.insert(USER_ID_KEY, user_id).await?;
    Ok(())
}

/// Ends the session and deletes it from the store.
pub async fn log_out(session: &Session) -> Result<(), ApiError> {
    session.flush().await?;
    Ok(())
}
