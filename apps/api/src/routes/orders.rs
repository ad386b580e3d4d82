//! # Order Endpoints
//!
//! Placement goes through [`OrderWorkflow`](confeitaria_db::OrderWorkflow),
//! which owns the transaction; reads query the order repository directly.
//!
//! ```text
//! POST /api/orders/single  {client_id, product_id, quantity, status?}
//!      → 201 {order_id, remaining_stock}
//! POST /api/orders/multi   {client_id, items: [{product_id, quantity}], status?}
//!      → 201 {order_id, remaining_stock: [{product_id, stock}]}
//! GET  /api/orders                       → [OrderLine]  newest order first
//! GET  /api/orders/client/{client_id}    → [OrderLine]
//! GET  /api/orders/{order_id}            → OrderDetail with total
//! ```

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use confeitaria_core::{CoreError, ItemRequest, OrderDetail, OrderLine, OrderStatus};
use confeitaria_db::{MultiItemOrder, SingleItemOrder};
use serde::Deserialize;

use super::required;
use crate::error::{ApiError, ApiResult};
use crate::session::RequireUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list))
        .route("/api/orders/single", post(create_single))
        .route("/api/orders/multi", post(create_multi))
        .route("/api/orders/client/{client_id}", get(list_for_client))
        .route("/api/orders/{order_id}", get(detail))
}

#[derive(Debug, Deserialize)]
pub struct SingleOrderRequest {
    pub client_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MultiOrderRequest {
    pub client_id: Option<i64>,
    pub items: Option<Vec<ItemBody>>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemBody {
    pub product_id: Option<i64>,
    pub quantity: Option<i64>,
}

fn parse_status(raw: Option<String>) -> Result<Option<OrderStatus>, ApiError> {
    Ok(raw.as_deref().map(str::parse::<OrderStatus>).transpose()?)
}

async fn create_single(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<SingleOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SingleItemOrder>)> {
    let Json(req) = body?;

    let client_id = required(req.client_id, "client_id")?;
    let product_id = required(req.product_id, "product_id")?;
    let quantity = required(req.quantity, "quantity")?;
    let status = parse_status(req.status)?;

    let placed = state
        .workflow
        .create_single_item_order(user.user_id, client_id, product_id, quantity, status)
        .await?;

    Ok((StatusCode::CREATED, Json(placed)))
}

async fn create_multi(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<MultiOrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MultiItemOrder>)> {
    let Json(req) = body?;

    let client_id = required(req.client_id, "client_id")?;
    let items = required(req.items, "items")?
        .into_iter()
        .map(|item| -> Result<ItemRequest, ApiError> {
            Ok(ItemRequest {
                product_id: required(item.product_id, "product_id")?,
                quantity: required(item.quantity, "quantity")?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    let status = parse_status(req.status)?;

    let placed = state
        .workflow
        .create_multi_item_order(user.user_id, client_id, &items, status)
        .await?;

    Ok((StatusCode::CREATED, Json(placed)))
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<Vec<OrderLine>>> {
    Ok(Json(state.db.orders().list_lines(user.user_id).await?))
}

async fn list_for_client(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Vec<OrderLine>>> {
    let Path(client_id) = path?;
    Ok(Json(
        state
            .db
            .orders()
            .list_lines_for_client(user.user_id, client_id)
            .await?,
    ))
}

async fn detail(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<OrderDetail>> {
    let Path(order_id) = path?;
    let detail = state
        .db
        .orders()
        .get_detail(user.user_id, order_id)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", order_id))?;

    Ok(Json(detail))
}
