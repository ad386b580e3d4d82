//! # Report Repository
//!
//! Aggregated read models for the dashboard.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::client::ClientRepository;
use confeitaria_core::{SalesReportRow, StatusSummary};

/// Repository for aggregate reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Clients per satisfaction status, every bucket present.
    pub async fn client_status_summary(&self, user_id: i64) -> DbResult<StatusSummary> {
        let counts = ClientRepository::new(self.pool.clone())
            .status_counts(user_id)
            .await?;

        Ok(StatusSummary::from_counts(counts))
    }

    /// Order count and value per order status, ordered by status name.
    ///
    /// Values use current product prices. Statuses without orders are
    /// omitted.
    pub async fn sales_by_status(&self, user_id: i64) -> DbResult<Vec<SalesReportRow>> {
        let rows = sqlx::query_as::<_, SalesReportRow>(
            "SELECT \
                o.status AS status, \
                COUNT(DISTINCT o.id) AS total_orders, \
                COALESCE(SUM(oi.quantity * p.price_cents), 0) AS total_value_cents \
             FROM orders o \
             LEFT JOIN order_items oi ON oi.order_id = o.id \
             LEFT JOIN products p ON p.id = oi.product_id \
             WHERE o.user_id = ?1 \
             GROUP BY o.status \
             ORDER BY o.status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(user_id, statuses = rows.len(), "Built sales report");
        Ok(rows)
    }
}
