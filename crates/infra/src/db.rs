//! Connection pool construction and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgPool};

use pickpoint_core::StoreError;

/// Connect a pool against `database_url`.
pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(StoreError::new)?;
    tracing::info!(max_connections = 10, "connected to postgres");
    Ok(pool)
}

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StoreError::new)?;
    tracing::info!("database migrations applied");
    Ok(())
}

/// Whether `err` is a unique-constraint violation.
///
/// Conditional inserts lean on this to turn index conflicts into outcome
/// variants instead of opaque store errors.
pub(crate) fn is_unique_violation(err: &Error) -> bool {
    matches!(err, Error::Database(db) if db.is_unique_violation())
}
