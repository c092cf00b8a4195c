use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub logging: LoggingConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bot_token = std::env::var("BOT_TOKEN")
            .or_else(|_| std::env::var("TELOXIDE_TOKEN"))
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing { key: "BOT_TOKEN" })?;

        Ok(Self {
            bot_token,
            logging: LoggingConfig::from_env(),
            session: SessionConfig::from_env(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// Daily rolling log files are written here when set.
    pub file_dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let file_logs = matches!(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            Some("true") | Some("1")
        );
        let file_dir = file_logs.then(|| {
            std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./logs"))
        });

        Self { level, file_dir }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Dialogue states untouched for longer than this are swept.
    pub idle_ttl: Duration,
    pub sweep_schedule: String,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let idle_ttl = std::env::var("SESSION_IDLE_TTL_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_ttl);

        let sweep_schedule =
            std::env::var("SESSION_SWEEP_SCHEDULE").unwrap_or(defaults.sweep_schedule);

        Self {
            idle_ttl,
            sweep_schedule,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(3600),
            sweep_schedule: "0 */10 * * * *".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required env var: {key}")]
    Missing { key: &'static str },
}
