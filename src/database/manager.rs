use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the database layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Database connection not initialized")]
    NotConnected,

    #[error("Invalid record id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Single shared connection pool, acquired at startup and held for the
/// process lifetime. Until `init` succeeds, `pool()` reports NotConnected
/// and data routes answer 503.
pub struct Database;

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Collection tables bootstrapped at connect time
const COLLECTIONS: [&str; 3] = ["users", "classes", "orders"];

impl Database {
    /// Connect the shared pool and bootstrap the collection tables
    pub async fn init() -> Result<(), DatabaseError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let cfg = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
            .connect(&url)
            .await?;

        Self::bootstrap(&pool).await?;

        if let Err(pool) = POOL.set(pool) {
            // Lost the race against a concurrent init; the first pool wins
            pool.close().await;
        } else {
            info!("database pool connected");
        }
        Ok(())
    }

    async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
        for table in COLLECTIONS {
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS \"{}\" (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
                table
            );
            sqlx::query(&sql).execute(pool).await?;
        }

        // The atomic registration variant needs a uniqueness constraint to
        // make insert-if-absent race-free; the default variant must not have
        // one, or its duplicate-tolerant behavior would change.
        if config::config().registration.atomic {
            sqlx::query(
                "CREATE UNIQUE INDEX IF NOT EXISTS users_email_key ON \"users\" ((doc->>'email'))",
            )
            .execute(pool)
            .await?;
        }
        Ok(())
    }

    /// Shared pool accessor
    pub fn pool() -> Result<PgPool, DatabaseError> {
        POOL.get().cloned().ok_or(DatabaseError::NotConnected)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool (on shutdown)
    pub async fn close() {
        if let Some(pool) = POOL.get() {
            pool.close().await;
            info!("closed database pool");
        }
    }
}
