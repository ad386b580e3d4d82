//! Product CRUD.
//!
//! Prices travel as integer cents. `stock` on create and update is an
//! absolute value (restocking); orders change it only through the
//! inventory ledger.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use confeitaria_core::{validation::validate_new_product, NewProduct, Product};
use serde::Deserialize;
use tracing::info;

use super::required;
use crate::error::{ApiError, ApiResult};
use crate::session::RequireUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route("/api/products/{id}", put(update).delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
    pub price_cents: Option<i64>,
    pub stock: Option<i64>,
}

impl ProductRequest {
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        Ok(validate_new_product(NewProduct {
            name: required(self.name, "name")?,
            price_cents: required(self.price_cents, "price_cents")?,
            stock: required(self.stock, "stock")?,
        })?)
    }
}

async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.db.products().list(user.user_id).await?))
}

async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(req) = body?;
    let new_product = req.into_new_product()?;

    let product = state.db.products().insert(user.user_id, &new_product).await?;
    info!(
        user_id = user.user_id,
        product_id = product.id,
        stock = product.stock,
        "Product created"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Path(id) = path?;
    let Json(req) = body?;
    let changes = req.into_new_product()?;

    let product = state.db.products().update(user.user_id, id, &changes).await?;
    info!(user_id = user.user_id, product_id = id, stock = product.stock, "Product updated");

    Ok(Json(product))
}

async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    state.db.products().delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
