use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbMode {
    ServerPostgres,
    LocalSqlite,
}

impl DbMode {
    pub fn detect() -> Self {
        if std::env::var("DATABASE_URL").is_ok() || std::env::var("DB_HOST").is_ok() {
            DbMode::ServerPostgres
        } else {
            DbMode::LocalSqlite
        }
    }
}

#[derive(Debug, Clone)]
pub enum DbTarget {
    Postgres { options: PgConnectOptions },
    Sqlite { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub target: DbTarget,
    pub pool: PoolConfig,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, DbConfigError> {
        let target = match DbMode::detect() {
            DbMode::ServerPostgres => DbTarget::Postgres {
                options: postgres_options_from_env()?,
            },
            DbMode::LocalSqlite => DbTarget::Sqlite {
                path: std::env::var("SQLITE_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| default_sqlite_path()),
            },
        };

        Ok(Self {
            target,
            pool: PoolConfig::from_env(),
        })
    }

    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            target: DbTarget::Sqlite { path: path.into() },
            pool: PoolConfig::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    fn from_env() -> Self {
        Self {
            max_connections: env_u32("DB_MAX_CONNECTIONS", 10),
            acquire_timeout: Duration::from_millis(env_u64("DB_ACQUIRE_TIMEOUT_MS", 5000)),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

fn postgres_options_from_env() -> Result<PgConnectOptions, DbConfigError> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return PgConnectOptions::from_str(&url).map_err(DbConfigError::InvalidUrl);
    }

    let host = required("DB_HOST")?;
    let name = required("DB_NAME")?;
    let user = required("DB_USER")?;
    let password = std::env::var("DB_PASSWORD").unwrap_or_default();
    let port = env_u16("DB_PORT", 5432);

    Ok(postgres_options(&host, port, &name, &user, &password))
}

/// Connection options from discrete settings. Credentials are passed as-is,
/// so they may contain URL delimiters.
pub fn postgres_options(host: &str, port: u16, name: &str, user: &str, password: &str) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(host)
        .port(port)
        .database(name)
        .username(user);
    if password.is_empty() {
        options
    } else {
        options.password(password)
    }
}

fn default_sqlite_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slova-bot")
        .join("data.db")
}

fn required(key: &'static str) -> Result<String, DbConfigError> {
    std::env::var(key).map_err(|_| DbConfigError::Missing { key })
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .unwrap_or(default)
}

#[derive(Debug, Error)]
pub enum DbConfigError {
    #[error("Missing required env var: {key}")]
    Missing { key: &'static str },
    #[error("Invalid DATABASE_URL: {0}")]
    InvalidUrl(#[source] sqlx::Error),
}
