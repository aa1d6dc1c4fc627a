use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::schema;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Maps a unique-constraint violation to `Conflict`, everything else passes through.
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        if is_unique_violation(&err) {
            DatabaseError::Conflict(format!("{} already exists", what))
        } else {
            DatabaseError::Sqlx(err)
        }
    }
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Handle to the backing store. Cheap to clone; clones share the pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    const MEMORY_URL: &'static str = "sqlite::memory:";

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.url.contains(":memory:") {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_with(options)
            .await?;

        info!("Connected database pool: {}", config.url);

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Private in-memory database. Every connection to `:memory:` is its own
    /// database, so the pool is pinned to exactly one long-lived connection.
    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let options = SqliteConnectOptions::from_str(Self::MEMORY_URL)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates all tables if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), DatabaseError> {
        for (table, ddl) in schema::TABLES {
            sqlx::query(ddl).execute(&self.pool).await?;
            tracing::debug!("Table ready: {}", table);
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_is_ready_and_idempotent() {
        let db = Database::in_memory().await.unwrap();
        db.health_check().await.unwrap();
        db.init_schema().await.unwrap();

        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'movies', 'favorites', 'ratings')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(count, 4);
    }

    #[tokio::test]
    async fn unique_violations_become_conflicts() {
        let db = Database::in_memory().await.unwrap();
        let insert = "INSERT INTO movies (title) VALUES ('Alien')";
        sqlx::query(insert).execute(db.pool()).await.unwrap();

        let err = sqlx::query(insert).execute(db.pool()).await.unwrap_err();
        assert!(is_unique_violation(&err));
        assert!(matches!(DatabaseError::from_write(err, "movie"), DatabaseError::Conflict(_)));
    }
}
