//! # Error Types
//!
//! Domain-specific error types for confeitaria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  confeitaria-core errors (this file)                                   │
//! │  ├── CoreError        - Business rule outcomes                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  confeitaria-db errors (separate crate)                                │
//! │  ├── DbError          - Storage failures                               │
//! │  └── OrderError       - CoreError | DbError from the order workflow    │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - {code, message} + HTTP status                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → OrderError → ApiError → client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Retry Semantics
//! | Variant              | Caller's fault | Retry?                         |
//! |----------------------|----------------|--------------------------------|
//! | `Validation`         | yes            | never                          |
//! | `NotFound`           | yes            | never                          |
//! | `InsufficientStock`  | no             | resubmit with less quantity    |
//! | `ConcurrentConflict` | no             | may resubmit the whole order   |

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business outcomes that stop an operation.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced entity is absent or not owned by the caller.
    ///
    /// Both cases are reported identically so callers cannot probe for
    /// other accounts' ids.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Not enough stock to reserve the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/orders/single { product_id: 7, quantity: 3 }
    ///      │
    ///      ▼
    /// stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// 409 "Insufficient stock for product 7: available 2, requested 3"
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Another transaction changed the product row first.
    #[error("Concurrent update on product {product_id}, please retry the order")]
    ConcurrentConflict { product_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any storage access; never retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
