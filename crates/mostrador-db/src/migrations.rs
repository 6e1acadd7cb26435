//! # Database Migrations
//!
//! SQL files under `crates/mostrador-db/migrations/` are embedded at compile
//! time and applied in filename order. Applied versions are tracked in
//! `_sqlx_migrations`.
//!
//! ## Adding New Migrations
//! 1. Add `NNN_description.sql` with the next number
//! 2. Write idempotent SQL (`IF NOT EXISTS`)
//! 3. **NEVER** edit a migration that has shipped

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Runs all pending database migrations. Safe to call repeatedly.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
