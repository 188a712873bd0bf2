//! Infrastructure Database Layer
//!
//! PostgreSQL adapter for the request store port using SQLx.
//!
//! # Concurrency contract
//!
//! Uniqueness and terminal-state invariants live in the database, not in
//! application reads:
//!
//! - Submissions are `INSERT .. ON CONFLICT (submitter_phone) DO NOTHING`;
//!   the insert outcome is the single source of truth for duplicates.
//! - Decisions are conditional updates (`.. WHERE status =
//!   'pending_verification'`); a racing decision finds zero rows updated
//!   and reports the conflict instead of double-processing.
//!
//! Queries use the runtime-bound SQLx API so the workspace builds without
//! a live database.

pub mod error;
pub mod pool;
pub mod store;

pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use store::PgRequestStore;

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
}
