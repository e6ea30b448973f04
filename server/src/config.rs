//! Server configuration from environment variables.
//!
//! `.env` is loaded by `main` before [`ServerConfig::from_env`] runs. Only
//! `DATABASE_URL` is required; numeric settings that are missing or fail to
//! parse fall back to their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LIVE_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    /// Built SPA served for every non-API path.
    pub dist_dir: PathBuf,
    pub db_max_connections: u32,
    /// Buffered comments per live websocket before inserts are dropped for it.
    pub live_channel_capacity: usize,
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `DATABASE_URL` is unset or empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => return Err(ConfigError::Missing("DATABASE_URL")),
        };

        Ok(Self {
            database_url,
            port: env_parse("PORT", DEFAULT_PORT),
            dist_dir: std::env::var("DIST_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DIST_DIR), PathBuf::from),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            live_channel_capacity: env_parse("LIVE_CHANNEL_CAPACITY", DEFAULT_LIVE_CHANNEL_CAPACITY).max(1),
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
