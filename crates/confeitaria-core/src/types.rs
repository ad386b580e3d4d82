//! # Domain Types
//!
//! Entities and status vocabularies shared by the store and the HTTP layer.
//!
//! ## Ownership Graph
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │                        ┌─────────────────┐                              │
//! │                        │      User       │  plan, email (unique)        │
//! │                        └────────┬────────┘                              │
//! │              ┌──────────────────┼──────────────────┐                    │
//! │              ▼                  ▼                  ▼                    │
//! │     ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐        │
//! │     │     Client      │ │     Product     │ │      Order      │        │
//! │     │  status         │ │  price_cents    │ │  status         │        │
//! │     │                 │ │  stock (>= 0)   │ │  payment_status │        │
//! │     └───┬─────────┬───┘ └────────┬────────┘ └───┬─────────────┘        │
//! │         │         └──────────────┼──────────────┤ client_id            │
//! │         ▼                        │              ▼                       │
//! │  ┌─────────────────┐             │     ┌─────────────────┐              │
//! │  │    Feedback     │             └────►│    OrderItem    │              │
//! │  │  rating 1..=5   │                   │  quantity > 0   │              │
//! │  └─────────────────┘                   └─────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by an `i64` row id assigned by the database.
//! Clients, products and orders additionally carry the owning `user_id`,
//! and every store query filters on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

fn not_allowed(field: &str, allowed: &[&str]) -> ValidationError {
    ValidationError::NotAllowed {
        field: field.to_string(),
        allowed: allowed.iter().map(|s| s.to_string()).collect(),
    }
}

// =============================================================================
// User
// =============================================================================

/// An account. Owns clients, products and orders.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,

    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip)]
    pub password_hash: String,

    /// Subscription plan label, `"Free"` on signup.
    pub plan: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Client
// =============================================================================

/// Satisfaction status of a client.
///
/// The wire and storage form is the human-readable label, including the
/// space in `"Needs improvement"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum ClientStatus {
    Satisfied,
    Unsatisfied,
    #[serde(rename = "Needs improvement")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Needs improvement"))]
    NeedsImprovement,
}

impl ClientStatus {
    /// Every bucket, in reporting order.
    pub const ALL: [ClientStatus; 3] = [
        ClientStatus::Satisfied,
        ClientStatus::Unsatisfied,
        ClientStatus::NeedsImprovement,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Satisfied => "Satisfied",
            ClientStatus::Unsatisfied => "Unsatisfied",
            ClientStatus::NeedsImprovement => "Needs improvement",
        }
    }
}

impl Default for ClientStatus {
    fn default() -> Self {
        ClientStatus::NeedsImprovement
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                not_allowed("status", &ClientStatus::ALL.map(|status| status.as_str()))
            })
    }
}

/// A customer record belonging to one user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Client {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub status: ClientStatus,
}

/// Fields for creating or replacing a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub status: ClientStatus,
}

// =============================================================================
// Product
// =============================================================================

/// A product with its current price and stock level.
///
/// `stock` is only decremented through the inventory ledger's guarded
/// update, so it never goes below zero.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub name: String,

    /// Price in cents.
    pub price_cents: i64,

    pub stock: i64,
}

/// Fields for creating or replacing a product.
///
/// Setting `stock` here is an absolute restock, not a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

// =============================================================================
// Feedback
// =============================================================================

/// A rating left for a client.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Feedback {
    pub id: i64,
    pub client_id: i64,

    /// 1 to 5 inclusive.
    pub rating: i64,

    pub comment: String,

    /// Reference to an uploaded photo, if any.
    pub photo: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields for recording a feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub client_id: i64,
    pub rating: i64,
    pub comment: String,
    pub photo: Option<String>,
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| not_allowed("status", &OrderStatus::ALL.map(|status| status.as_str())))
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment state of an order. New orders always start `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// An order header. Its total is derived from the items at read time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub client_id: i64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A line of an order. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}

/// One requested line of a multi-item order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Stock left on a product after a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RemainingStock {
    pub product_id: i64,
    pub stock: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
