//! # Order Workflow
//!
//! Places orders. Each order is one transaction: the order header, its
//! items and every stock decrement commit together or not at all.
//!
//! ## Single vs Multi
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_single_item_order            create_multi_item_order            │
//! │                                                                         │
//! │  validate                             validate (items non-empty, ...)   │
//! │  BEGIN                                BEGIN                             │
//! │  client owned by user?                client owned by user?             │
//! │  reserve(product, qty)                INSERT orders                     │
//! │  INSERT orders                        for each item, in request order:  │
//! │  INSERT order_items                     reserve(product, qty)           │
//! │  COMMIT                                 INSERT order_items              │
//! │                                       COMMIT                            │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction → full rollback         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The owner id always comes from the caller's session; nothing in the
//! request body can pick the account.

use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use tracing::{error, info, warn};

use crate::error::{DbError, OrderError};
use crate::inventory::InventoryLedger;
use crate::pool::Database;
use crate::repository::client::ClientRepository;
use crate::repository::order::OrderRepository;
use confeitaria_core::validation::{validate_order_items, validate_quantity};
use confeitaria_core::{CoreError, ItemRequest, OrderStatus, RemainingStock};

/// Result of a committed single-item order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleItemOrder {
    pub order_id: i64,
    pub remaining_stock: i64,
}

/// Result of a committed multi-item order.
///
/// `remaining_stock` has one entry per request line, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiItemOrder {
    pub order_id: i64,
    pub remaining_stock: Vec<RemainingStock>,
}

/// Order placement service.
#[derive(Debug, Clone)]
pub struct OrderWorkflow {
    db: Database,
}

impl OrderWorkflow {
    pub fn new(db: Database) -> Self {
        OrderWorkflow { db }
    }

    /// Places an order for one product.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/orders/single { client_id: 3, product_id: 7, quantity: 3 }
    ///      │
    ///      ▼
    /// stock 5 → 2, order + item written
    ///      │
    ///      ▼
    /// { order_id: 12, remaining_stock: 2 }
    /// ```
    pub async fn create_single_item_order(
        &self,
        owner_user_id: i64,
        client_id: i64,
        product_id: i64,
        quantity: i64,
        status: Option<OrderStatus>,
    ) -> Result<SingleItemOrder, OrderError> {
        validate_quantity(quantity)?;
        let status = status.unwrap_or_default();

        let outcome = self
            .place_single(owner_user_id, client_id, product_id, quantity, status)
            .await;

        match &outcome {
            Ok(placed) => info!(
                order_id = placed.order_id,
                user_id = owner_user_id,
                client_id,
                product_id,
                quantity,
                remaining_stock = placed.remaining_stock,
                "Single-item order placed"
            ),
            Err(err) => log_rejection(owner_user_id, client_id, err),
        }

        outcome
    }

    /// Places an order for several products at once.
    ///
    /// Items are reserved in request order; the first failing item aborts
    /// the whole order and its error is returned unchanged.
    pub async fn create_multi_item_order(
        &self,
        owner_user_id: i64,
        client_id: i64,
        items: &[ItemRequest],
        status: Option<OrderStatus>,
    ) -> Result<MultiItemOrder, OrderError> {
        validate_order_items(items)?;
        let status = status.unwrap_or_default();

        let outcome = self
            .place_multi(owner_user_id, client_id, items, status)
            .await;

        match &outcome {
            Ok(placed) => info!(
                order_id = placed.order_id,
                user_id = owner_user_id,
                client_id,
                items = items.len(),
                "Multi-item order placed"
            ),
            Err(err) => log_rejection(owner_user_id, client_id, err),
        }

        outcome
    }

    async fn place_single(
        &self,
        owner_user_id: i64,
        client_id: i64,
        product_id: i64,
        quantity: i64,
        status: OrderStatus,
    ) -> Result<SingleItemOrder, OrderError> {
        let mut tx = self.begin().await?;
        ensure_client(&mut tx, owner_user_id, client_id).await?;

        let left = InventoryLedger::reserve(&mut *tx, product_id, owner_user_id, quantity).await?;

        let order = OrderRepository::insert_order(&mut *tx, owner_user_id, client_id, status)
            .await
            .map_err(|e| OrderError::from_db(e, product_id))?;
        OrderRepository::insert_item(&mut *tx, order.id, product_id, quantity)
            .await
            .map_err(|e| OrderError::from_db(e, product_id))?;

        tx.commit()
            .await
            .map_err(|e| OrderError::from_db(DbError::from(e), product_id))?;

        Ok(SingleItemOrder {
            order_id: order.id,
            remaining_stock: left.stock,
        })
    }

    async fn place_multi(
        &self,
        owner_user_id: i64,
        client_id: i64,
        items: &[ItemRequest],
        status: OrderStatus,
    ) -> Result<MultiItemOrder, OrderError> {
        let mut tx = self.begin().await?;
        ensure_client(&mut tx, owner_user_id, client_id).await?;

        let first_product = items[0].product_id;
        let order = OrderRepository::insert_order(&mut *tx, owner_user_id, client_id, status)
            .await
            .map_err(|e| OrderError::from_db(e, first_product))?;

        let mut remaining = Vec::with_capacity(items.len());
        for item in items {
            let left =
                InventoryLedger::reserve(&mut *tx, item.product_id, owner_user_id, item.quantity)
                    .await?;
            OrderRepository::insert_item(&mut *tx, order.id, item.product_id, item.quantity)
                .await
                .map_err(|e| OrderError::from_db(e, item.product_id))?;
            remaining.push(left);
        }

        let last_product = items[items.len() - 1].product_id;
        tx.commit()
            .await
            .map_err(|e| OrderError::from_db(DbError::from(e), last_product))?;

        Ok(MultiItemOrder {
            order_id: order.id,
            remaining_stock: remaining,
        })
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, OrderError> {
        self.db.begin().await.map_err(OrderError::Storage)
    }
}

/// Rejects the order unless the client belongs to the owner.
async fn ensure_client(
    tx: &mut Transaction<'static, Sqlite>,
    owner_user_id: i64,
    client_id: i64,
) -> Result<(), OrderError> {
    if ClientRepository::is_owned_by(&mut **tx, owner_user_id, client_id).await? {
        Ok(())
    } else {
        Err(CoreError::not_found("Client", client_id).into())
    }
}

fn log_rejection(owner_user_id: i64, client_id: i64, err: &OrderError) {
    match err {
        OrderError::Core(
            CoreError::InsufficientStock { .. } | CoreError::ConcurrentConflict { .. },
        ) => warn!(user_id = owner_user_id, client_id, error = %err, "Order rejected"),
        OrderError::Core(_) => {
            info!(user_id = owner_user_id, client_id, error = %err, "Order refused")
        }
        OrderError::Storage(_) => {
            error!(user_id = owner_user_id, client_id, error = %err, "Order failed in storage")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;
    use confeitaria_core::ValidationError;

    #[tokio::test]
    async fn test_single_item_scenario() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let maria = test_support::client(&db, ana.id, "Maria").await;
        let bolo = test_support::product(&db, ana.id, "Bolo", 4500, 5).await;
        let workflow = OrderWorkflow::new(db.clone());

        let placed = workflow
            .create_single_item_order(ana.id, maria.id, bolo.id, 3, None)
            .await
            .unwrap();
        assert_eq!(placed.remaining_stock, 2);

        let err = workflow
            .create_single_item_order(ana.id, maria.id, bolo.id, 3, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Core(CoreError::InsufficientStock { available: 2, requested: 3, .. })
        ));

        let stored = db.products().get(ana.id, bolo.id).await.unwrap().unwrap();
        assert_eq!(stored.stock, 2);
        assert_eq!(db.orders().count(ana.id).await.unwrap(), 1);

        let order = db.orders().get(ana.id, placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_multi_item_scenario() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let maria = test_support::client(&db, ana.id, "Maria").await;
        let p = test_support::product(&db, ana.id, "Bolo", 4500, 5).await;
        let q = test_support::product(&db, ana.id, "Doce", 250, 5).await;
        let workflow = OrderWorkflow::new(db.clone());

        let placed = workflow
            .create_multi_item_order(
                ana.id,
                maria.id,
                &[
                    ItemRequest { product_id: p.id, quantity: 2 },
                    ItemRequest { product_id: q.id, quantity: 1 },
                ],
                Some(OrderStatus::Confirmed),
            )
            .await
            .unwrap();

        assert_eq!(
            placed.remaining_stock,
            vec![
                RemainingStock { product_id: p.id, stock: 3 },
                RemainingStock { product_id: q.id, stock: 4 },
            ]
        );
        assert_eq!(db.orders().count(ana.id).await.unwrap(), 1);
        assert_eq!(db.orders().items(ana.id, placed.order_id).await.unwrap().len(), 2);

        let detail = db.orders().get_detail(ana.id, placed.order_id).await.unwrap().unwrap();
        assert_eq!(detail.status, OrderStatus::Confirmed);
        assert_eq!(detail.total_cents, 2 * 4500 + 250);
    }

    #[tokio::test]
    async fn test_multi_item_rolls_back_on_short_item() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let maria = test_support::client(&db, ana.id, "Maria").await;
        let p1 = test_support::product(&db, ana.id, "Bolo", 4500, 5).await;
        let p2 = test_support::product(&db, ana.id, "Doce", 250, 10).await;
        let workflow = OrderWorkflow::new(db.clone());

        let err = workflow
            .create_multi_item_order(
                ana.id,
                maria.id,
                &[
                    ItemRequest { product_id: p1.id, quantity: 2 },
                    ItemRequest { product_id: p2.id, quantity: 999_999 },
                ],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Core(CoreError::InsufficientStock { product_id, .. }) if product_id == p2.id
        ));

        assert_eq!(db.orders().count(ana.id).await.unwrap(), 0);
        let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(item_count, 0);
        assert_eq!(db.products().get(ana.id, p1.id).await.unwrap().unwrap().stock, 5);
    }

    #[tokio::test]
    async fn test_validation_before_storage() {
        let db = test_support::database().await;
        let workflow = OrderWorkflow::new(db.clone());

        let err = workflow
            .create_single_item_order(1, 1, 1, 0, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Core(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));

        let err = workflow
            .create_multi_item_order(1, 1, &[], None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Core(CoreError::Validation(ValidationError::Required { .. }))
        ));
    }

    #[tokio::test]
    async fn test_foreign_client_and_product_not_found() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let bia = test_support::user(&db, "bia@example.com").await;
        let ana_client = test_support::client(&db, ana.id, "Maria").await;
        let bia_client = test_support::client(&db, bia.id, "Joana").await;
        let bia_product = test_support::product(&db, bia.id, "Torta", 3000, 5).await;
        let ana_product = test_support::product(&db, ana.id, "Bolo", 4500, 5).await;
        let workflow = OrderWorkflow::new(db.clone());

        let err = workflow
            .create_single_item_order(ana.id, bia_client.id, ana_product.id, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Core(CoreError::NotFound { ref entity, .. }) if entity == "Client"));

        let err = workflow
            .create_single_item_order(ana.id, ana_client.id, bia_product.id, 1, None)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Core(CoreError::NotFound { ref entity, .. }) if entity == "Product"));

        assert_eq!(db.products().get(bia.id, bia_product.id).await.unwrap().unwrap().stock, 5);
        assert_eq!(db.orders().count(ana.id).await.unwrap(), 0);
    }
}
