//! Persistence layer for the Redress complaint desk.
//!
//! - [`models`]: row types and request DTOs.
//! - [`repositories`]: PostgreSQL queries, one zero-sized repo per table.
//! - [`store`]: the storage traits the API depends on, with PostgreSQL and
//!   in-memory implementations.

pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

/// Connection pool type used throughout the application.
pub type DbPool = sqlx::PgPool;

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
