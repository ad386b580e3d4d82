//! # Database Migrations
//!
//! Embedded schema migrations for the SQLite database.
//!
//! ## Migration Files
//! Located in `migrations/sqlite/` at the workspace root and embedded into
//! the binary at compile time.
//!
//! ## Adding Migrations
//! 1. Create a new file: `migrations/sqlite/NNN_description.sql`
//! 2. Use sequential numbering (001, 002, ...)
//! 3. **NEVER** modify existing migrations - always add new ones
//!
//! The session table is not part of these migrations; the session store
//! creates and migrates its own table.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// `/health/ready` reports unready while `applied < total`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
