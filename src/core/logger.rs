//! Logger façade shared by the synchronous and asynchronous loggers
//!
//! Both logger kinds own a [`LoggerCore`] (name, sinks, thresholds) and run the
//! same fan-out over it. A synchronous [`Logger`] fans out on the caller thread;
//! an [`AsyncLogger`](super::async_logger::AsyncLogger) hands the record to its
//! worker pool and fans out there.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::{LogRecord, SourceLoc},
    sink::SinkPtr,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Callback receiving errors raised while dispatching on a worker thread
pub type ErrorHandler = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// State common to every logger kind
///
/// Writing to the sinks is crate-internal: a synchronous [`Logger`] does it on
/// the caller thread, an async logger only on its pool's workers.
///
/// ```compile_fail
/// use rust_async_logger::prelude::*;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ThreadPool::new(16, 1).unwrap());
/// let logger = AsyncLogger::new("app", Vec::new(), &pool, OverflowPolicy::Block);
/// let record = LogRecord::new("app", LogLevel::Info, "skips the queue");
/// logger.core().fan_out(&record).unwrap();
/// ```
///
/// ```compile_fail
/// use rust_async_logger::prelude::*;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ThreadPool::new(16, 1).unwrap());
/// let logger = AsyncLogger::new("app", Vec::new(), &pool, OverflowPolicy::Block);
/// logger.core().flush_sinks().unwrap();
/// ```
pub struct LoggerCore {
    name: Arc<str>,
    sinks: RwLock<Vec<SinkPtr>>,
    level: AtomicU8,
    flush_level: AtomicU8,
    error_handler: RwLock<Option<ErrorHandler>>,
}

impl LoggerCore {
    pub fn new(name: impl Into<String>, sinks: Vec<SinkPtr>) -> Self {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            sinks: RwLock::new(sinks),
            level: AtomicU8::new(LogLevel::Trace as u8),
            flush_level: AtomicU8::new(LogLevel::Off as u8),
            error_handler: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn flush_level(&self) -> LogLevel {
        LogLevel::from_u8(self.flush_level.load(Ordering::Relaxed))
    }

    pub fn flush_on(&self, level: LogLevel) {
        self.flush_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn sinks(&self) -> Vec<SinkPtr> {
        self.sinks.read().clone()
    }

    /// Append a sink
    ///
    /// Sinks are meant to be configured before logging starts; changing them
    /// while records are in flight gives no ordering guarantee about which
    /// records see the change.
    pub fn add_sink(&self, sink: SinkPtr) {
        self.sinks.write().push(sink);
    }

    /// Remove a sink by identity
    pub fn remove_sink(&self, sink: &SinkPtr) {
        self.sinks.write().retain(|s| !Arc::ptr_eq(s, sink));
    }

    pub fn set_error_handler(&self, handler: ErrorHandler) {
        *self.error_handler.write() = Some(handler);
    }

    /// Hand an error to the configured handler, or report it on stderr
    pub fn report_error(&self, err: &LoggerError) {
        match self.error_handler.read().as_ref() {
            Some(handler) => handler(err),
            None => eprintln!("[LOGGER ERROR] Logger '{}': {}", self.name, err),
        }
    }

    /// Write `record` to every sink that accepts its level, then auto-flush
    ///
    /// A failing or panicking sink does not stop the remaining sinks; the first
    /// error is returned once every sink was tried.
    pub(crate) fn fan_out(&self, record: &LogRecord<'_>) -> Result<()> {
        let mut first_error = None;
        {
            let sinks = self.sinks.read();
            for sink in sinks.iter().filter(|s| s.should_log(record.level)) {
                if let Err(e) = isolate(|| sink.log(record)) {
                    first_error.get_or_insert(e);
                }
            }
        }

        let flush_level = self.flush_level();
        if flush_level != LogLevel::Off && record.level >= flush_level {
            if let Err(e) = self.flush_sinks() {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Flush every sink, trying all of them even if one fails
    pub(crate) fn flush_sinks(&self) -> Result<()> {
        let mut first_error = None;
        for sink in self.sinks.read().iter() {
            if let Err(e) = isolate(|| sink.flush()) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Run a sink call, converting a panic into a `SinkPanicked` error
fn isolate(f: impl FnOnce() -> Result<()>) -> Result<()> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::from_panic(panic_info.as_ref())),
    }
}

impl fmt::Debug for LoggerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerCore")
            .field("name", &self.name)
            .field("sinks", &self.sinks.read().len())
            .field("level", &self.level())
            .field("flush_level", &self.flush_level())
            .finish()
    }
}

/// Common logger contract used by call sites and the registry
pub trait Log: Send + Sync {
    fn core(&self) -> &LoggerCore;

    /// Deliver a record that already passed the level filter
    fn sink_it(&self, record: &LogRecord<'_>) -> Result<()>;

    /// Flush every sink (synchronously, or by posting a flush request)
    fn flush(&self) -> Result<()>;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn level(&self) -> LogLevel {
        self.core().level()
    }

    fn set_level(&self, level: LogLevel) {
        self.core().set_level(level);
    }

    fn flush_level(&self) -> LogLevel {
        self.core().flush_level()
    }

    /// Flush automatically after any record at or above `level`
    fn flush_on(&self, level: LogLevel) {
        self.core().flush_on(level);
    }

    fn sinks(&self) -> Vec<SinkPtr> {
        self.core().sinks()
    }

    fn add_sink(&self, sink: SinkPtr) {
        self.core().add_sink(sink);
    }

    fn remove_sink(&self, sink: &SinkPtr) {
        self.core().remove_sink(sink);
    }

    fn should_log(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    fn log_at(
        &self,
        level: LogLevel,
        source: Option<SourceLoc>,
        args: fmt::Arguments<'_>,
    ) -> Result<()> {
        if !self.should_log(level) {
            return Ok(());
        }

        // The payload lives on this stack frame; async loggers copy it before queueing
        let formatted;
        let payload = match args.as_str() {
            Some(s) => s,
            None => {
                formatted = args.to_string();
                formatted.as_str()
            }
        };

        let mut record = LogRecord::new(self.name(), level, payload);
        record.source = source;
        self.sink_it(&record)
    }

    fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) -> Result<()> {
        self.log_at(level, None, args)
    }

    fn log(&self, level: LogLevel, message: &str) -> Result<()> {
        if !self.should_log(level) {
            return Ok(());
        }
        self.sink_it(&LogRecord::new(self.name(), level, message))
    }

    fn trace(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Trace, message)
    }

    fn debug(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Debug, message)
    }

    fn info(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Info, message)
    }

    fn warn(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Warn, message)
    }

    fn error(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Error, message)
    }

    fn critical(&self, message: &str) -> Result<()> {
        self.log(LogLevel::Critical, message)
    }
}

/// Synchronous logger: fans out on the calling thread
#[derive(Debug)]
pub struct Logger {
    core: LoggerCore,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sinks(name, Vec::new())
    }

    #[must_use]
    pub fn with_sinks(name: impl Into<String>, sinks: Vec<SinkPtr>) -> Self {
        Self {
            core: LoggerCore::new(name, sinks),
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_async_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let logger = Logger::builder("app")
    ///     .level(LogLevel::Debug)
    ///     .sink(Arc::new(MemorySink::new()))
    ///     .build();
    /// assert_eq!(logger.level(), LogLevel::Debug);
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl Log for Logger {
    fn core(&self) -> &LoggerCore {
        &self.core
    }

    fn sink_it(&self, record: &LogRecord<'_>) -> Result<()> {
        self.core.fan_out(record)
    }

    fn flush(&self) -> Result<()> {
        self.core.flush_sinks()
    }
}

/// Builder for constructing loggers with a fluent API
pub struct LoggerBuilder {
    name: String,
    sinks: Vec<SinkPtr>,
    level: LogLevel,
    flush_level: LogLevel,
    error_handler: Option<ErrorHandler>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sinks: Vec::new(),
            level: LogLevel::Trace,
            flush_level: LogLevel::Off,
            error_handler: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: SinkPtr) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sinks(mut self, sinks: impl IntoIterator<Item = SinkPtr>) -> Self {
        self.sinks.extend(sinks);
        self
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Flush every sink after records at or above `level`
    #[must_use = "builder methods return a new value"]
    pub fn flush_on(mut self, level: LogLevel) -> Self {
        self.flush_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_handler(mut self, handler: ErrorHandler) -> Self {
        self.error_handler = Some(handler);
        self
    }

    pub(crate) fn into_core(self) -> LoggerCore {
        let core = LoggerCore::new(self.name, self.sinks);
        core.set_level(self.level);
        core.flush_on(self.flush_level);
        if let Some(handler) = self.error_handler {
            core.set_error_handler(handler);
        }
        core
    }

    /// Build a synchronous logger
    pub fn build(self) -> Logger {
        Logger {
            core: self.into_core(),
        }
    }

    /// Build an asynchronous logger bound (weakly) to `pool`
    pub fn build_async(
        self,
        pool: &Arc<super::thread_pool::ThreadPool>,
        policy: super::overflow_policy::OverflowPolicy,
    ) -> Arc<super::async_logger::AsyncLogger> {
        super::async_logger::AsyncLogger::from_core(self.into_core(), Arc::downgrade(pool), policy)
    }
}
