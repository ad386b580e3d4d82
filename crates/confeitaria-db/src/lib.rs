//! # confeitaria-db: Database Layer
//!
//! SQLite storage for the order-management backend: connection pool,
//! embedded migrations, owner-scoped repositories, the inventory ledger and
//! the order workflow.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Confeitaria Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (POST /api/orders/multi)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  confeitaria-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ OrderWorkflow │───►│InventoryLedger│    │  Migrations  │  │   │
//! │  │   │ (workflow.rs) │    │(inventory.rs) │    │  (embedded)  │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │ one transaction    │                               │   │
//! │  │   ┌───────▼────────────────────▼──┐    ┌──────────────────┐   │   │
//! │  │   │   Database (pool.rs)          │◄───│  Repositories    │   │   │
//! │  │   │   SqlitePool, begin()         │    │  users, clients, │   │   │
//! │  │   └───────────────────────────────┘    │  products, ...   │   │   │
//! │  │                                        └──────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  │                      ./confeitaria.db                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation, configuration and transactions
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and order error types
//! - [`repository`] - Owner-scoped repositories
//! - [`inventory`] - Guarded stock decrement
//! - [`workflow`] - Atomic order placement
//! - [`password`] - Argon2 password hashes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use confeitaria_db::{Database, DbConfig, OrderWorkflow};
//!
//! let db = Database::new(DbConfig::new("./confeitaria.db")).await?;
//!
//! let placed = OrderWorkflow::new(db.clone())
//!     .create_single_item_order(user_id, client_id, product_id, 3, None)
//!     .await?;
//! println!("stock left: {}", placed.remaining_stock);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, OrderError};
pub use inventory::InventoryLedger;
pub use pool::{Database, DbConfig};
pub use workflow::{MultiItemOrder, OrderWorkflow, SingleItemOrder};

// Repository re-exports for convenience
pub use repository::client::ClientRepository;
pub use repository::feedback::FeedbackRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
pub use repository::report::ReportRepository;
pub use repository::user::UserRepository;
