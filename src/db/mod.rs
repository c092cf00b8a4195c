pub mod config;
pub mod operations;
pub mod schema;
pub mod seed;

use std::str::FromStr;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use thiserror::Error;

use crate::db::config::{DbConfig, DbConfigError, DbTarget};

/// Connection pool for whichever backend the deployment selected.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub async fn from_env() -> Result<Self, DbInitError> {
        let config = DbConfig::from_env()?;
        Self::connect(&config).await
    }

    pub async fn connect(config: &DbConfig) -> Result<Self, DbInitError> {
        let pool = match &config.target {
            DbTarget::Postgres { options } => {
                let pool = PgPoolOptions::new()
                    .max_connections(config.pool.max_connections)
                    .acquire_timeout(config.pool.acquire_timeout)
                    .connect_with(options.clone())
                    .await?;
                DbPool::Postgres(pool)
            }
            DbTarget::Sqlite { path } => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent).map_err(DbInitError::Io)?;
                }

                let db_url = format!("sqlite:{}?mode=rwc", path.display());
                let options = SqliteConnectOptions::from_str(&db_url)?
                    .create_if_missing(true)
                    .foreign_keys(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(config.pool.acquire_timeout);

                let pool = SqlitePoolOptions::new()
                    .max_connections(config.pool.max_connections)
                    .acquire_timeout(config.pool.acquire_timeout)
                    .connect_with(options)
                    .await?;
                DbPool::Sqlite(pool)
            }
        };

        tracing::info!(backend = pool.backend_name(), "database pool ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn close(&self) {
        match &self.pool {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

impl DbPool {
    pub fn backend_name(&self) -> &'static str {
        match self {
            DbPool::Postgres(_) => "postgres",
            DbPool::Sqlite(_) => "sqlite",
        }
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error(transparent)]
    Config(#[from] DbConfigError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to prepare database directory: {0}")]
    Io(std::io::Error),
}
