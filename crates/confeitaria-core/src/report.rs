//! # Report Views
//!
//! Read-side shapes returned by the reporting queries, plus the pure
//! aggregation that turns raw rows into API responses.
//!
//! ## Derived, Never Stored
//! ```text
//! order_items ⋈ orders ⋈ products ⋈ clients
//!        │
//!        ▼
//! OrderLine { quantity, price_cents, total_cents = quantity × price_cents }
//!        │
//!        ▼  OrderDetail::from_lines
//! OrderDetail { lines, total_cents = Σ line totals }
//! ```
//! Totals use the product's price at read time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ClientStatus, OrderStatus, PaymentStatus};

// =============================================================================
// Order Lines
// =============================================================================

/// One order item joined with its order, client and product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub order_id: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub client_id: i64,
    pub client_name: String,
    pub item_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub price_cents: i64,
    pub quantity: i64,
    /// `quantity × price_cents`, computed by the query.
    pub total_cents: i64,
}

impl OrderLine {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// An order with all of its lines and the derived total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderDetail {
    pub order_id: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub client_id: i64,
    pub client_name: String,
    pub lines: Vec<OrderLine>,
    pub total_cents: i64,
}

impl OrderDetail {
    /// Builds the detail view from the lines of a single order.
    ///
    /// Returns `None` for an empty slice. Header fields come from the first
    /// line; every line is expected to share the same `order_id`.
    ///
    /// ## Example
    /// ```rust
    /// use confeitaria_core::OrderDetail;
    ///
    /// assert!(OrderDetail::from_lines(Vec::new()).is_none());
    /// ```
    pub fn from_lines(lines: Vec<OrderLine>) -> Option<Self> {
        let first = lines.first()?.clone();
        let total: Money = lines.iter().map(OrderLine::total).sum();

        Some(OrderDetail {
            order_id: first.order_id,
            status: first.status,
            payment_status: first.payment_status,
            created_at: first.created_at,
            client_id: first.client_id,
            client_name: first.client_name,
            lines,
            total_cents: total.cents(),
        })
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Feedback View
// =============================================================================

/// A feedback joined with the name of its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct FeedbackView {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub rating: i64,
    pub comment: String,
    pub photo: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Client Status Summary
// =============================================================================

/// Number of clients per status. All three buckets are always present.
///
/// ## Wire Format
/// ```json
/// { "Satisfied": 1, "Unsatisfied": 0, "Needs improvement": 2 }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusSummary {
    #[serde(rename = "Satisfied")]
    pub satisfied: i64,
    #[serde(rename = "Unsatisfied")]
    pub unsatisfied: i64,
    #[serde(rename = "Needs improvement")]
    pub needs_improvement: i64,
}

impl StatusSummary {
    /// Builds a summary from `(status, count)` pairs such as a `GROUP BY`
    /// result. Missing statuses stay at zero; repeated statuses add up.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (ClientStatus, i64)>,
    {
        counts
            .into_iter()
            .fold(StatusSummary::default(), |mut summary, (status, count)| {
                *summary.bucket_mut(status) += count;
                summary
            })
    }

    fn bucket_mut(&mut self, status: ClientStatus) -> &mut i64 {
        match status {
            ClientStatus::Satisfied => &mut self.satisfied,
            ClientStatus::Unsatisfied => &mut self.unsatisfied,
            ClientStatus::NeedsImprovement => &mut self.needs_improvement,
        }
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Orders and their value for one order status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SalesReportRow {
    pub status: OrderStatus,
    pub total_orders: i64,
    /// Σ quantity × current price over every item of those orders.
    pub total_value_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
