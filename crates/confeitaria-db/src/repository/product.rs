//! # Product Repository
//!
//! Owner-scoped product CRUD.
//!
//! ## Stock Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Who Writes products.stock                        │
//! │                                                                     │
//! │  update() (this file)      SET stock = ?         absolute restock   │
//! │                                                   validated >= 0    │
//! │                                                                     │
//! │  InventoryLedger::reserve  SET stock = stock - ?  guarded by        │
//! │                            AND stock >= ?         the same WHERE    │
//! │                                                                     │
//! │  Nothing else. There is no unguarded decrement.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use confeitaria_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// let products = repo.list(user_id).await?;
/// let product = repo.get(user_id, 7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the user's products by name.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, user_id, name, price_cents, stock FROM products \
             WHERE user_id = ?1 ORDER BY name, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets one of the user's products.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Missing, or owned by another user
    pub async fn get(&self, user_id: i64, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, user_id, name, price_cents, stock FROM products \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    pub async fn insert(&self, user_id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(user_id, name = %product.name, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO products (user_id, name, price_cents, stock) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(user_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            user_id,
            name: product.name.clone(),
            price_cents: product.price_cents,
            stock: product.stock,
        })
    }

    /// Replaces a product's name, price and stock level.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such product for this user
    pub async fn update(&self, user_id: i64, id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(user_id, id, stock = product.stock, "Updating product");

        let result = sqlx::query(
            "UPDATE products SET name = ?3, price_cents = ?4, stock = ?5 \
             WHERE id = ?1 AND user_id = ?2",
        )
        .bind(id)
        .bind(user_id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(Product {
            id,
            user_id,
            name: product.name.clone(),
            price_cents: product.price_cents,
            stock: product.stock,
        })
    }

    /// Deletes a product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such product for this user
    /// * `Err(DbError::ForeignKeyViolation)` - Product appears in an order
    pub async fn delete(&self, user_id: i64, id: i64) -> DbResult<()> {
        debug!(user_id, id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND user_id = ?2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts the user's products (for diagnostics and seeding).
    pub async fn count(&self, user_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support;

    #[tokio::test]
    async fn test_insert_list_update() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;

        let bolo = test_support::product(&db, ana.id, "Bolo", 4500, 3).await;
        test_support::product(&db, ana.id, "Brigadeiro", 250, 40).await;

        let names: Vec<_> = db
            .products()
            .list(ana.id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Bolo", "Brigadeiro"]);

        let restocked = db
            .products()
            .update(
                ana.id,
                bolo.id,
                &NewProduct {
                    name: "Bolo".to_string(),
                    price_cents: 5000,
                    stock: 10,
                },
            )
            .await
            .unwrap();
        assert_eq!(restocked.stock, 10);

        let stored = db.products().get(ana.id, bolo.id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 5000);
        assert_eq!(stored.stock, 10);
        assert_eq!(db.products().count(ana.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_other_users_product_is_invisible() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;
        let bia = test_support::user(&db, "bia@example.com").await;
        let bolo = test_support::product(&db, ana.id, "Bolo", 4500, 3).await;

        assert!(db.products().get(bia.id, bolo.id).await.unwrap().is_none());
        assert!(matches!(
            db.products().delete(bia.id, bolo.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(db.products().get(ana.id, bolo.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = test_support::database().await;
        let ana = test_support::user(&db, "ana@example.com").await;

        let result = db
            .products()
            .insert(
                ana.id,
                &NewProduct {
                    name: "Bolo".to_string(),
                    price_cents: 4500,
                    stock: -1,
                },
            )
            .await;
        assert!(matches!(result, Err(DbError::QueryFailed(_))));
    }
}
