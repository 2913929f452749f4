use anyhow::{Context, Result};
use std::env;

const DEFAULT_DATABASE_URL: &str = "./push_metrics.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_RETENTION_DAYS: i64 = 30;
const DEFAULT_LOG_FILE: &str = "logs/pushctl.log";

/// Push metrics tooling configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite database file path. Env: `DATABASE_URL`.
    pub database_url: String,
    /// Env: `DATABASE_MAX_CONNECTIONS`.
    pub max_connections: u32,
    /// Push message information older than this many days is removed by cleanup.
    /// Env: `PUSH_RETENTION_DAYS`.
    pub retention_days: i64,
    /// Env: `LOG_FILE`.
    pub log_file: String,
}

impl AppConfig {
    /// Loads configuration from the environment, falling back to defaults for unset variables.
    /// Set variables that fail to parse are an error.
    pub fn load() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let retention_days = parse_var("PUSH_RETENTION_DAYS", DEFAULT_RETENTION_DAYS)?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        if retention_days < 0 {
            anyhow::bail!("PUSH_RETENTION_DAYS must not be negative (got {})", retention_days);
        }

        Ok(Self {
            database_url,
            max_connections,
            retention_days,
            log_file,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
