//! # confeitaria-core: Pure Business Logic
//!
//! Domain types, money arithmetic, validation and report aggregation for the
//! order-management backend. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Confeitaria Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum, sessions)                       │   │
//! │  │   /api/orders/single  /api/orders/multi  /api/clients ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ confeitaria-core (THIS CRATE) ★                  │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ OrderLine │  │   rules   │  │   │
//! │  │   │   Order   │  │  (cents)  │  │  Summary  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                confeitaria-db (SQLite layer)                    │   │
//! │  │     repositories, inventory ledger, order workflow              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (User, Client, Product, Order, ...) and status enums
//! - [`money`] - Integer money in minor units
//! - [`error`] - Domain error taxonomy
//! - [`validation`] - Input validation rules
//! - [`report`] - Read-side views and aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use confeitaria_core::money::Money;
//!
//! let price = Money::from_cents(1250); // 12.50
//! let line_total = price * 3;
//! assert_eq!(line_total.cents(), 3750);
//! assert_eq!(line_total.to_string(), "37.50");
//! ```

pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::*;
pub use types::*;

/// Plan assigned to new accounts.
pub const DEFAULT_PLAN: &str = "Free";

/// Maximum number of line items in a multi-item order.
///
/// ## Business Reason
/// Keeps a single order transaction short; a bakery order rarely has more
/// than a few dozen lines.
pub const MAX_ORDER_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

/// Maximum product price in cents (1,000,000.00).
///
/// Line totals are computed in SQL as `quantity * price_cents`; with both
/// factors capped the product stays below 10^14, and report sums over
/// tens of thousands of such lines still fit in an `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
