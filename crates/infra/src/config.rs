//! Engine configuration: environment, JSON file, or defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockline_observability::{LogConfig, LogFormat};

pub const ENV_PERSISTENCE_TIMEOUT_MS: &str = "STOCKLINE_PERSISTENCE_TIMEOUT_MS";
pub const ENV_NOTIFICATIONS: &str = "STOCKLINE_NOTIFICATIONS";
pub const ENV_DISPLAY_UTC_OFFSET: &str = "STOCKLINE_DISPLAY_UTC_OFFSET";
pub const ENV_PAGE_SIZE: &str = "STOCKLINE_PAGE_SIZE";
pub const ENV_MAX_PAGE_SIZE: &str = "STOCKLINE_MAX_PAGE_SIZE";
pub const ENV_LOG_FORMAT: &str = "STOCKLINE_LOG_FORMAT";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("malformed configuration json: {0}")]
    Json(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Budget for all persistence steps of one workflow call.
    pub persistence_timeout_ms: u64,
    /// When false, notifications are only logged.
    pub notifications_enabled: bool,
    /// Offset used when rendering history timestamps (Asia/Jakarta is +7).
    pub display_utc_offset_hours: i32,
    pub list_default_page_size: u32,
    pub list_max_page_size: u32,
    pub log: LogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            persistence_timeout_ms: 8_000,
            notifications_enabled: true,
            display_utc_offset_hours: 7,
            list_default_page_size: 20,
            list_max_page_size: 200,
            log: LogConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn persistence_timeout(&self) -> Duration {
        Duration::from_millis(self.persistence_timeout_ms)
    }

    pub fn display_offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.display_utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "display_utc_offset_hours out of range: {}",
                self.display_utc_offset_hours
            ))
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.persistence_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "persistence_timeout_ms must be positive".to_string(),
            ));
        }
        if !(-12..=14).contains(&self.display_utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "display_utc_offset_hours must be within -12..=14 (got {})",
                self.display_utc_offset_hours
            )));
        }
        if self.list_default_page_size == 0 || self.list_max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".to_string()));
        }
        if self.list_default_page_size > self.list_max_page_size {
            return Err(ConfigError::Invalid(format!(
                "list_default_page_size {} exceeds list_max_page_size {}",
                self.list_default_page_size, self.list_max_page_size
            )));
        }
        Ok(())
    }

    /// Read the process environment; unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ENV_PERSISTENCE_TIMEOUT_MS) {
            cfg.persistence_timeout_ms = parse_value(ENV_PERSISTENCE_TIMEOUT_MS, &v)?;
        }
        if let Some(v) = lookup(ENV_NOTIFICATIONS) {
            cfg.notifications_enabled = parse_flag(ENV_NOTIFICATIONS, &v)?;
        }
        if let Some(v) = lookup(ENV_DISPLAY_UTC_OFFSET) {
            cfg.display_utc_offset_hours = parse_value(ENV_DISPLAY_UTC_OFFSET, &v)?;
        }
        if let Some(v) = lookup(ENV_PAGE_SIZE) {
            cfg.list_default_page_size = parse_value(ENV_PAGE_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_PAGE_SIZE) {
            cfg.list_max_page_size = parse_value(ENV_MAX_PAGE_SIZE, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_FORMAT) {
            cfg.log.format = LogFormat::parse(&v).ok_or_else(|| invalid(ENV_LOG_FORMAT, &v))?;
        }
        if let Some(v) = lookup(ENV_RUST_LOG).filter(|v| !v.trim().is_empty()) {
            cfg.log.default_filter = v.trim().to_string();
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(raw).map_err(|e| ConfigError::Json(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    tracing::warn!(key, value, "malformed configuration value");
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| invalid(key, raw))
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, raw)),
    }
}
