//! # Inventory Ledger
//!
//! The only code path that decrements `products.stock`.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve(conn, product_id, owner, qty)      (inside caller's tx)        │
//! │                                                                         │
//! │  1. qty > 0?                         no  → Validation                   │
//! │  2. SELECT stock                                                        │
//! │     WHERE id = ? AND user_id = ?     none → NotFound                    │
//! │  3. stock >= qty?                    no  → InsufficientStock            │
//! │  4. UPDATE products                                                     │
//! │     SET stock = stock - qty                                             │
//! │     WHERE id = ? AND user_id = ?                                        │
//! │       AND stock >= qty               0 rows → ConcurrentConflict        │
//! │     RETURNING stock                  busy   → ConcurrentConflict        │
//! │  5. return remaining stock                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 4 re-checks the condition in the same statement that writes, so
//! the read in step 2 only decides which error to report. Two reservations
//! racing for the last unit cannot both pass step 4.
//!
//! The ledger never opens, commits or rolls back a transaction.

use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::{DbError, OrderError};
use confeitaria_core::validation::validate_quantity;
use confeitaria_core::{CoreError, RemainingStock};

/// Stock reservation against a caller-owned transaction.
pub struct InventoryLedger;

impl InventoryLedger {
    /// Decrements `quantity` units of the owner's product.
    ///
    /// ## Returns
    /// * `Ok(RemainingStock)` - Stock after the decrement
    /// * `Err(Core(Validation))` - Quantity not positive
    /// * `Err(Core(NotFound))` - Product missing or owned by someone else
    /// * `Err(Core(InsufficientStock))` - Not enough stock
    /// * `Err(Core(ConcurrentConflict))` - Another transaction changed the row
    /// * `Err(Storage(_))` - Any other storage failure
    pub async fn reserve(
        conn: &mut SqliteConnection,
        product_id: i64,
        owner_user_id: i64,
        quantity: i64,
    ) -> Result<RemainingStock, OrderError> {
        validate_quantity(quantity)?;

        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1 AND user_id = ?2")
                .bind(product_id)
                .bind(owner_user_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(|e| OrderError::from_db(DbError::from(e), product_id))?;

        let available = available.ok_or_else(|| CoreError::not_found("Product", product_id))?;

        if available < quantity {
            warn!(product_id, available, requested = quantity, "Insufficient stock");
            return Err(CoreError::InsufficientStock {
                product_id,
                available,
                requested: quantity,
            }
            .into());
        }

        let remaining: Option<i64> = sqlx::query_scalar(
            "UPDATE products SET stock = stock - ?3 \
             WHERE id = ?1 AND user_id = ?2 AND stock >= ?3 \
             RETURNING stock",
        )
        .bind(product_id)
        .bind(owner_user_id)
        .bind(quantity)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| OrderError::from_db(DbError::from(e), product_id))?;

        let Some(stock) = remaining else {
            warn!(product_id, "Stock changed between read and decrement");
            return Err(CoreError::ConcurrentConflict { product_id }.into());
        };

        debug!(product_id, quantity, remaining = stock, "Reserved stock");
        Ok(RemainingStock { product_id, stock })
    }
}
