//! # Repository Module
//!
//! Database repository implementations.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(user_id)                                   │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, user_id)                                              │
//! │  ├── get(&self, user_id, id)                                           │
//! │  ├── insert(&self, user_id, product)                                   │
//! │  └── update(&self, user_id, id, product)                               │
//! │       │                                                                 │
//! │       │  SQL with `AND user_id = ?` on every statement                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership Rule
//! Every method on an owned resource takes the owning `user_id` and puts it
//! in the WHERE clause. A row owned by someone else is indistinguishable
//! from a missing row.
//!
//! ## Available Repositories
//!
//! - [`user::UserRepository`] - Accounts and plans
//! - [`client::ClientRepository`] - Client CRUD and status counts
//! - [`product::ProductRepository`] - Product CRUD and restocking
//! - [`feedback::FeedbackRepository`] - Feedback records
//! - [`order::OrderRepository`] - Transaction-scoped order writes and order reads
//! - [`report::ReportRepository`] - Aggregated dashboards

pub mod client;
pub mod feedback;
pub mod order;
pub mod product;
pub mod report;
pub mod user;
