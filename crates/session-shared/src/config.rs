//! Configuration management

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    BACKEND_MEMORY, BACKEND_REDIS, DEFAULT_MAX_ATTEMPTS, DEFAULT_REDIS_MAX_CONNECTIONS,
    DEFAULT_RETRY_BACKOFF_MS,
};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub redis: RedisSettings,
    pub session: SessionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    /// `redis` or `memory`
    pub backend: String,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

/// Which key-value backend the session store runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Redis,
    Memory,
}

impl SessionSettings {
    pub fn backend(&self) -> Result<Backend, ConfigError> {
        match self.backend.trim().to_lowercase().as_str() {
            BACKEND_REDIS => Ok(Backend::Redis),
            BACKEND_MEMORY => Ok(Backend::Memory),
            other => Err(ConfigError::Message(format!(
                "unknown session backend `{}` (expected `{}` or `{}`)",
                other, BACKEND_REDIS, BACKEND_MEMORY
            ))),
        }
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        config.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "session-server")?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("redis.max_connections", i64::from(DEFAULT_REDIS_MAX_CONNECTIONS))?
            .set_default("session.backend", BACKEND_REDIS)?
            .set_default("session.max_attempts", i64::from(DEFAULT_MAX_ATTEMPTS))?
            .set_default("session.retry_backoff_ms", DEFAULT_RETRY_BACKOFF_MS as i64)
    }
}
