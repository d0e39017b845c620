//! Serializable configuration for the pool and the registry

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    thread_pool::{DEFAULT_QUEUE_SIZE, DEFAULT_THREAD_COUNT, MAX_QUEUE_SIZE, MAX_THREAD_COUNT},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Worker pool sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolConfig {
    /// Queue slots shared by every producer
    pub queue_size: usize,
    /// Number of worker threads
    pub thread_count: usize,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            queue_size: DEFAULT_QUEUE_SIZE,
            thread_count: DEFAULT_THREAD_COUNT,
        }
    }
}

impl ThreadPoolConfig {
    pub fn new(queue_size: usize, thread_count: usize) -> Self {
        Self {
            queue_size,
            thread_count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_QUEUE_SIZE).contains(&self.queue_size) {
            return Err(LoggerError::config(
                "ThreadPoolConfig",
                format!("queue_size must be between 1 and {}", MAX_QUEUE_SIZE),
            ));
        }
        if !(1..=MAX_THREAD_COUNT).contains(&self.thread_count) {
            return Err(LoggerError::config(
                "ThreadPoolConfig",
                format!("thread_count must be between 1 and {}", MAX_THREAD_COUNT),
            ));
        }
        Ok(())
    }
}

/// Settings applied by [`Registry::from_config`](super::registry::Registry::from_config)
///
/// # Example
///
/// ```
/// use rust_async_logger::{LogLevel, RegistryConfig};
///
/// let config = RegistryConfig::from_json(r#"{
///     "thread_pool": { "queue_size": 1024, "thread_count": 2 },
///     "level": "warn"
/// }"#).unwrap();
///
/// assert_eq!(config.thread_pool.thread_count, 2);
/// assert_eq!(config.level, LogLevel::Warn);
/// assert_eq!(config.flush_level, LogLevel::Off);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub thread_pool: ThreadPoolConfig,
    /// Level of the default logger and of loggers created by the registry
    pub level: LogLevel,
    /// Auto-flush threshold; `off` disables auto-flush
    pub flush_level: LogLevel,
    /// Pattern applied to the sinks of registry-created loggers
    pub pattern: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            thread_pool: ThreadPoolConfig::default(),
            level: LogLevel::Info,
            flush_level: LogLevel::Off,
            pattern: None,
        }
    }
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "read config",
                format!("Failed to read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.thread_pool.validate()?;
        if matches!(&self.pattern, Some(p) if p.is_empty()) {
            return Err(LoggerError::config(
                "RegistryConfig",
                "pattern must not be empty",
            ));
        }
        Ok(())
    }
}
