//! Server configuration read from environment variables.

use chrono::Duration;
use std::env;
use thiserror::Error;

use crate::session::service::SyncSettings;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got {value:?}")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Unset means sessions are only kept in memory
    pub database_url: Option<String>,
    pub session_ttl_days: i64,
    pub auto_sync: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            database_url: None,
            session_ttl_days: 365,
            auto_sync: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let session_ttl_days = match get("SESSION_TTL_DAYS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: "SESSION_TTL_DAYS",
                    expected: "a positive number of days",
                    value,
                })?,
            None => defaults.session_ttl_days,
        };

        let auto_sync = match get("AUTO_SYNC") {
            Some(value) => value
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "AUTO_SYNC",
                    expected: "true or false",
                    value,
                })?,
            None => defaults.auto_sync,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_url: get("DATABASE_URL"),
            session_ttl_days,
            auto_sync,
        })
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            auto_sync: self.auto_sync,
            ttl: Some(Duration::days(self.session_ttl_days)),
        }
    }
}
