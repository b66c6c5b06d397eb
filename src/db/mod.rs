//! Database layer (SQLite via sqlx).

pub mod plans;
pub mod strava;
pub mod users;

pub use plans::NewSession;
pub use strava::NewActivity;

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database handle shared across request handlers.
#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open the database and run schema migrations.
    pub async fn new(database_url: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // A pooled :memory: database is only shared while a single
        // connection holds it open.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        let db = Self { pool };
        db.migrate().await?;

        tracing::info!(url = database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the pool for advanced operations.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run schema migrations.
    async fn migrate(&self) -> Result<(), AppError> {
        self.migrate_users().await?;
        self.migrate_plans().await?;
        self.migrate_strava().await?;
        Ok(())
    }
}
