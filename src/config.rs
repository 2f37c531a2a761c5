use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::debug;

pub const DEFAULT_DATABASE_PATH: &str = "data/newsdb.sqlite";
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Runtime settings, read from the environment (optionally via a `.env` file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `NEWSDB_PATH`
    pub database_path: PathBuf,
    /// `NEWSDB_LOG`, used when `RUST_LOG` is unset
    pub log_filter: String,
    /// `NEWSDB_POOL_SIZE`
    pub pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl AppConfig {
    /// Loads `.env` from the current directory if present, then reads the process environment
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded .env from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_path = lookup("NEWSDB_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let log_filter = lookup("NEWSDB_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        let pool_size = match lookup("NEWSDB_POOL_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| format!("NEWSDB_POOL_SIZE must be a positive integer, got '{raw}'"))?,
            None => defaults.pool_size,
        };

        Ok(Self {
            database_path,
            log_filter,
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, AppConfig::default());
        Ok(())
    }

    #[test]
    fn test_reads_overrides() -> Result<()> {
        let config = AppConfig::from_lookup(lookup(&[
            ("NEWSDB_PATH", "/tmp/news.db"),
            ("NEWSDB_LOG", "debug"),
            ("NEWSDB_POOL_SIZE", "8"),
        ]))?;

        assert_eq!(config.database_path, PathBuf::from("/tmp/news.db"));
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.pool_size, 8);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_pool_size() {
        assert!(AppConfig::from_lookup(lookup(&[("NEWSDB_POOL_SIZE", "zero")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("NEWSDB_POOL_SIZE", "0")])).is_err());
    }
}
