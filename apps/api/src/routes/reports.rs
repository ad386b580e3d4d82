//! Dashboard reports.

use axum::{extract::State, routing::get, Json, Router};
use confeitaria_core::SalesReportRow;

use crate::error::ApiResult;
use crate::session::RequireUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/reports/sales", get(sales))
}

/// Order count and value per status; statuses without orders are omitted.
async fn sales(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<Vec<SalesReportRow>>> {
    Ok(Json(state.db.reports().sales_by_status(user.user_id).await?))
}
