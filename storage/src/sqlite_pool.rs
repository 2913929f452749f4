//! SQLite connection pool wrapper for the storage crate.

use log::info;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Manages a single SQLite pool; creates DB file if missing.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database file path (a plain path, not a
    /// `sqlite:` URL). The binary passes `AppConfig::database_url`, read from
    /// `DATABASE_URL`; use [`Self::with_max_connections`] to honor
    /// `DATABASE_MAX_CONNECTIONS` as well.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        Self::with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Like [`Self::new`] with an explicit pool size (at least 1).
    pub async fn with_max_connections(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, sqlx::Error> {
        info!(
            "Initializing SQLite pool: {} (max_connections={})",
            database_url, max_connections
        );

        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .foreign_keys(true)
            .filename(database_url);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
