//! # Order Repository
//!
//! Order writes and order reads.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Write Path                                  │
//! │                                                                         │
//! │  OrderWorkflow                                                         │
//! │     │  let mut tx = db.begin()                                         │
//! │     │                                                                   │
//! │     ├── OrderRepository::insert_order(&mut *tx, ...)   ← THIS FILE     │
//! │     ├── InventoryLedger::reserve(&mut *tx, ...)                        │
//! │     ├── OrderRepository::insert_item(&mut *tx, ...)    ← THIS FILE     │
//! │     │                                                                   │
//! │     └── tx.commit()                                                    │
//! │                                                                         │
//! │  The write functions take a connection, not the pool, so they can only │
//! │  run inside a transaction someone else opened and will commit.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! Order lines join items with their order, client and product. The line
//! total is `quantity × price_cents` computed by SQLite from the product's
//! current price.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use confeitaria_core::{Order, OrderDetail, OrderItem, OrderLine, OrderStatus, PaymentStatus};

const LINE_SELECT: &str = "SELECT \
        o.id AS order_id, \
        o.status, \
        o.payment_status, \
        o.created_at, \
        c.id AS client_id, \
        c.name AS client_name, \
        oi.id AS item_id, \
        p.id AS product_id, \
        p.name AS product_name, \
        p.price_cents, \
        oi.quantity, \
        oi.quantity * p.price_cents AS total_cents \
    FROM orders o \
    JOIN order_items oi ON oi.order_id = o.id \
    JOIN products p ON p.id = oi.product_id \
    JOIN clients c ON c.id = o.client_id";

const LINE_ORDER: &str = "ORDER BY o.id DESC, oi.id ASC";

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    // =========================================================================
    // Transaction-scoped writes
    // =========================================================================

    /// Inserts an order header. Payment always starts `Pending`.
    pub async fn insert_order(
        conn: &mut SqliteConnection,
        user_id: i64,
        client_id: i64,
        status: OrderStatus,
    ) -> DbResult<Order> {
        let now = Utc::now();
        let payment_status = PaymentStatus::Pending;

        let result = sqlx::query(
            "INSERT INTO orders (user_id, client_id, status, payment_status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(user_id)
        .bind(client_id)
        .bind(status)
        .bind(payment_status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        debug!(order_id = id, user_id, client_id, %status, "Inserted order");

        Ok(Order {
            id,
            user_id,
            client_id,
            status,
            payment_status,
            created_at: now,
        })
    }

    /// Inserts one order line.
    pub async fn insert_item(
        conn: &mut SqliteConnection,
        order_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> DbResult<OrderItem> {
        let result = sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity) VALUES (?1, ?2, ?3)",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        debug!(order_id, item_id = id, product_id, quantity, "Inserted order item");

        Ok(OrderItem {
            id,
            order_id,
            product_id,
            quantity,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets one of the user's order headers.
    pub async fn get(&self, user_id: i64, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, user_id, client_id, status, payment_status, created_at FROM orders \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Items of an order in insertion order.
    pub async fn items(&self, user_id: i64, order_id: i64) -> DbResult<Vec<OrderItem>> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity FROM order_items oi \
             JOIN orders o ON o.id = oi.order_id \
             WHERE oi.order_id = ?1 AND o.user_id = ?2 ORDER BY oi.id",
        )
        .bind(order_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Every order line of the user, newest order first.
    pub async fn list_lines(&self, user_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "{LINE_SELECT} WHERE o.user_id = ?1 {LINE_ORDER}"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, count = lines.len(), "Listed order lines");
        Ok(lines)
    }

    /// Order lines of one client of the user, newest order first.
    pub async fn list_lines_for_client(&self, user_id: i64, client_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "{LINE_SELECT} WHERE o.user_id = ?1 AND o.client_id = ?2 {LINE_ORDER}"
        ))
        .bind(user_id)
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// One order with its lines and derived total.
    pub async fn get_detail(&self, user_id: i64, order_id: i64) -> DbResult<Option<OrderDetail>> {
        let lines = sqlx::query_as::<_, OrderLine>(&format!(
            "{LINE_SELECT} WHERE o.user_id = ?1 AND o.id = ?2 {LINE_ORDER}"
        ))
        .bind(user_id)
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(OrderDetail::from_lines(lines))
    }

    /// Counts the user's orders.
    pub async fn count(&self, user_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
