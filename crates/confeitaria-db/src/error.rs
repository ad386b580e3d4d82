//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► OrderError (workflow) ← Busy becomes ConcurrentConflict     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/api) ← {code, message} + HTTP status                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use confeitaria_core::{CoreError, ValidationError};
use thiserror::Error;

/// SQLite primary result codes we care about.
///
/// Extended codes carry the primary code in their low byte, so
/// `SQLITE_BUSY_SNAPSHOT` (517) and `SQLITE_LOCKED_SHAREDCACHE` (262)
/// classify the same as their primaries.
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;
const SQLITE_CONSTRAINT: i64 = 19;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    /// - Row exists but belongs to another user
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Signing up with an email that is already registered
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Deleting a client that still has orders or feedbacks
    /// - Deleting a product referenced by an order item
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The database file is locked by another writer, or this
    /// transaction's snapshot went stale before it could write.
    ///
    /// ## When This Occurs
    /// - Two order transactions decrement stock at the same moment
    /// - The busy timeout elapses while another connection holds the lock
    #[error("Database busy: {0}")]
    Busy(String),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Disk full
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - CHECK constraint rejected a row
    /// - Runtime SQL error
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Whether retrying the whole operation could succeed.
    pub fn is_busy(&self) -> bool {
        matches!(self, DbError::Busy(_))
    }
}

fn primary_code(db_err: &dyn sqlx::error::DatabaseError) -> Option<i64> {
    db_err
        .code()
        .and_then(|code| code.parse::<i64>().ok())
        .map(|code| code & 0xff)
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → by SQLite code: BUSY/LOCKED → Busy,
///                               CONSTRAINT → Unique / ForeignKey / QueryFailed
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                let code = primary_code(&*db_err);

                if matches!(code, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
                    || msg.contains("database is locked")
                {
                    DbError::Busy(msg.to_string())
                } else if msg.contains("UNIQUE constraint failed") {
                    // "UNIQUE constraint failed: <table>.<column>"
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if code == Some(SQLITE_CONSTRAINT) {
                    DbError::QueryFailed(format!("constraint: {msg}"))
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Order Error
// =============================================================================

/// Outcome of the inventory ledger and the order workflow.
///
/// ## Retry Semantics
/// ```text
/// Core(Validation | NotFound)      → caller error, never retried
/// Core(InsufficientStock)          → resubmit with a smaller quantity
/// Core(ConcurrentConflict)         → resubmit the whole order
/// Storage(_)                       → server-side failure
/// ```
#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl OrderError {
    /// Classifies a storage error raised while touching `product_id`.
    ///
    /// A busy or stale-snapshot database means another order got to the
    /// row first, which is a conflict rather than a storage failure.
    pub fn from_db(err: DbError, product_id: i64) -> Self {
        if err.is_busy() {
            OrderError::Core(CoreError::ConcurrentConflict { product_id })
        } else {
            OrderError::Storage(err)
        }
    }
}

impl From<ValidationError> for OrderError {
    fn from(err: ValidationError) -> Self {
        OrderError::Core(CoreError::Validation(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err: DbError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, DbError::PoolExhausted));
        assert!(!err.is_busy());
    }

    #[test]
    fn test_busy_is_retryable() {
        assert!(DbError::Busy("database is locked".to_string()).is_busy());
    }

    #[test]
    fn test_busy_becomes_conflict() {
        let err = OrderError::from_db(DbError::Busy("database is locked".to_string()), 7);
        assert!(matches!(
            err,
            OrderError::Core(CoreError::ConcurrentConflict { product_id: 7 })
        ));

        let err = OrderError::from_db(DbError::PoolExhausted, 7);
        assert!(matches!(err, OrderError::Storage(DbError::PoolExhausted)));
    }
}
