//! Named logger registry
//!
//! A [`Registry`] owns the loggers created through it, the default logger and
//! the worker pool shared by every async logger it creates. It is an ordinary
//! value: applications that want a process-wide registry keep one in a static
//! of their own.

use super::{
    async_logger::AsyncLogger,
    config::{RegistryConfig, ThreadPoolConfig},
    error::{LoggerError, Result},
    log_level::LogLevel,
    logger::{Log, Logger, LoggerBuilder},
    overflow_policy::OverflowPolicy,
    sink::SinkPtr,
    thread_pool::ThreadPool,
};
use crate::sinks::{ConsoleSink, FileSink, RotatingFileSink};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Shared handle to any logger kind
pub type LoggerPtr = Arc<dyn Log>;

pub const DEFAULT_LOGGER_NAME: &str = "default";

struct RegistryState {
    loggers: HashMap<String, LoggerPtr>,
    default_logger: Option<LoggerPtr>,
    level: LogLevel,
    flush_level: LogLevel,
    pattern: Option<String>,
}

pub struct Registry {
    state: Mutex<RegistryState>,
    thread_pool: Mutex<Option<Arc<ThreadPool>>>,
    pool_config: ThreadPoolConfig,
}

impl Registry {
    /// Create a registry whose default logger writes colored output to stdout
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry from a validated configuration
    ///
    /// The worker pool is not created until an async logger needs it.
    pub fn from_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: RegistryConfig) -> Self {
        let sink: SinkPtr = Arc::new(ConsoleSink::stdout_color());
        if let Some(pattern) = &config.pattern {
            sink.set_pattern(pattern);
        }
        let default_logger: LoggerPtr = Arc::new(
            Logger::builder(DEFAULT_LOGGER_NAME)
                .sink(sink)
                .level(config.level)
                .flush_on(config.flush_level)
                .build(),
        );

        Self {
            state: Mutex::new(RegistryState {
                loggers: HashMap::new(),
                default_logger: Some(default_logger),
                level: config.level,
                flush_level: config.flush_level,
                pattern: config.pattern,
            }),
            thread_pool: Mutex::new(None),
            pool_config: config.thread_pool,
        }
    }

    /// Register a logger under its name
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::LoggerAlreadyExists`] if the name is taken.
    pub fn register(&self, logger: LoggerPtr) -> Result<()> {
        let mut state = self.state.lock();
        let name = logger.name().to_owned();
        if state.loggers.contains_key(&name) {
            return Err(LoggerError::logger_exists(name));
        }
        state.loggers.insert(name, logger);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<LoggerPtr> {
        self.state.lock().loggers.get(name).cloned()
    }

    /// Remove a logger; handles held elsewhere stay usable
    pub fn drop_logger(&self, name: &str) -> Option<LoggerPtr> {
        self.state.lock().loggers.remove(name)
    }

    pub fn drop_all(&self) {
        let loggers = std::mem::take(&mut self.state.lock().loggers);
        drop(loggers);
    }

    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().loggers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn default_logger(&self) -> Option<LoggerPtr> {
        self.state.lock().default_logger.clone()
    }

    pub fn set_default_logger(&self, logger: LoggerPtr) {
        self.state.lock().default_logger = Some(logger);
    }

    /// Set the level of every registered logger, the default logger, and of
    /// loggers created afterwards
    pub fn set_level(&self, level: LogLevel) {
        let mut state = self.state.lock();
        state.level = level;
        for logger in state.loggers.values() {
            logger.set_level(level);
        }
        if let Some(logger) = &state.default_logger {
            logger.set_level(level);
        }
    }

    /// Flush every logger, trying all of them; returns the first error
    ///
    /// Async loggers only queue a flush request.
    pub fn flush_all(&self) -> Result<()> {
        let loggers: Vec<LoggerPtr> = {
            let state = self.state.lock();
            state
                .loggers
                .values()
                .cloned()
                .chain(state.default_logger.clone())
                .collect()
        };

        let mut first_error = None;
        for logger in loggers {
            if let Err(e) = logger.flush() {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Replace the shared pool with a new one of the given size
    ///
    /// Async loggers bound to the previous pool lose it once its last strong
    /// handle is gone.
    pub fn init_thread_pool(&self, queue_size: usize, thread_count: usize) -> Result<()> {
        let pool = Arc::new(ThreadPool::new(queue_size, thread_count)?);
        let previous = self.thread_pool.lock().replace(pool);
        // Joining happens here, outside the lock
        drop(previous);
        Ok(())
    }

    /// The shared pool, created with the configured size on first use
    pub fn thread_pool(&self) -> Result<Arc<ThreadPool>> {
        let mut slot = self.thread_pool.lock();
        if let Some(pool) = slot.as_ref() {
            return Ok(Arc::clone(pool));
        }
        let pool = Arc::new(ThreadPool::from_config(&self.pool_config)?);
        *slot = Some(Arc::clone(&pool));
        Ok(pool)
    }

    pub fn set_thread_pool(&self, pool: Arc<ThreadPool>) {
        let previous = self.thread_pool.lock().replace(pool);
        drop(previous);
    }

    /// Flush and drop every logger, then release the pool
    ///
    /// If nothing else holds the pool, this drains its queue and joins the
    /// workers before returning.
    pub fn shutdown(&self) {
        if let Err(e) = self.flush_all() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let (loggers, default_logger) = {
            let mut state = self.state.lock();
            (std::mem::take(&mut state.loggers), state.default_logger.take())
        };
        drop(loggers);
        drop(default_logger);

        let pool = self.thread_pool.lock().take();
        drop(pool);
    }

    fn configured_builder(&self, name: String, sinks: Vec<SinkPtr>) -> LoggerBuilder {
        let state = self.state.lock();
        if let Some(pattern) = &state.pattern {
            for sink in &sinks {
                sink.set_pattern(pattern);
            }
        }
        LoggerBuilder::new(name)
            .sinks(sinks)
            .level(state.level)
            .flush_on(state.flush_level)
    }

    fn ensure_unregistered(&self, name: &str) -> Result<()> {
        if self.state.lock().loggers.contains_key(name) {
            return Err(LoggerError::logger_exists(name));
        }
        Ok(())
    }

    /// Build and register a synchronous logger
    pub fn create_logger(&self, name: impl Into<String>, sinks: Vec<SinkPtr>) -> Result<Arc<Logger>> {
        let logger = Arc::new(self.configured_builder(name.into(), sinks).build());
        self.register(Arc::clone(&logger) as LoggerPtr)?;
        Ok(logger)
    }

    /// Build and register an async logger on the shared pool
    pub fn create_async_logger(
        &self,
        name: impl Into<String>,
        sinks: Vec<SinkPtr>,
        policy: OverflowPolicy,
    ) -> Result<Arc<AsyncLogger>> {
        let pool = self.thread_pool()?;
        let logger = self
            .configured_builder(name.into(), sinks)
            .build_async(&pool, policy);
        self.register(Arc::clone(&logger) as LoggerPtr)?;
        Ok(logger)
    }

    pub fn stdout_color(&self, name: impl Into<String>) -> Result<Arc<Logger>> {
        self.create_logger(name, vec![Arc::new(ConsoleSink::stdout_color())])
    }

    pub fn stderr_color(&self, name: impl Into<String>) -> Result<Arc<Logger>> {
        self.create_logger(name, vec![Arc::new(ConsoleSink::stderr_color())])
    }

    pub fn file_logger(
        &self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        truncate: bool,
    ) -> Result<Arc<Logger>> {
        let name = name.into();
        self.ensure_unregistered(&name)?;
        let sink = FileSink::with_truncate(path, truncate)?;
        self.create_logger(name, vec![Arc::new(sink)])
    }

    pub fn rotating_file_logger(
        &self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        max_size: u64,
        max_files: usize,
    ) -> Result<Arc<Logger>> {
        let name = name.into();
        self.ensure_unregistered(&name)?;
        let sink = RotatingFileSink::new(path, max_size, max_files)?;
        self.create_logger(name, vec![Arc::new(sink)])
    }

    pub fn async_stdout_color(
        &self,
        name: impl Into<String>,
        policy: OverflowPolicy,
    ) -> Result<Arc<AsyncLogger>> {
        self.create_async_logger(name, vec![Arc::new(ConsoleSink::stdout_color())], policy)
    }

    pub fn async_stderr_color(
        &self,
        name: impl Into<String>,
        policy: OverflowPolicy,
    ) -> Result<Arc<AsyncLogger>> {
        self.create_async_logger(name, vec![Arc::new(ConsoleSink::stderr_color())], policy)
    }

    pub fn async_file(
        &self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        truncate: bool,
        policy: OverflowPolicy,
    ) -> Result<Arc<AsyncLogger>> {
        let name = name.into();
        self.ensure_unregistered(&name)?;
        let sink = FileSink::with_truncate(path, truncate)?;
        self.create_async_logger(name, vec![Arc::new(sink)], policy)
    }

    pub fn async_rotating_file(
        &self,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        max_size: u64,
        max_files: usize,
        policy: OverflowPolicy,
    ) -> Result<Arc<AsyncLogger>> {
        let name = name.into();
        self.ensure_unregistered(&name)?;
        let sink = RotatingFileSink::new(path, max_size, max_files)?;
        self.create_async_logger(name, vec![Arc::new(sink)], policy)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Registry")
            .field("loggers", &state.loggers.len())
            .field("level", &state.level)
            .field("flush_level", &state.flush_level)
            .field("pattern", &state.pattern)
            .field("thread_pool", &*self.thread_pool.lock())
            .finish()
    }
}
