//! # Rust Async Logger
//!
//! A logging library that moves formatting and I/O off the calling thread.
//!
//! ## Features
//!
//! - **Asynchronous dispatch**: async loggers copy each record into an envelope
//!   and post it to a shared pool of worker threads
//! - **Bounded memory**: a fixed-capacity queue with a per-logger overflow
//!   policy (`Block` waits for room, `Overwrite` evicts the oldest envelope)
//! - **Multiple sinks**: console (optionally colored), file, size-rotating file
//!   with optional gzip backups, and an in-memory sink
//! - **Registry**: named loggers, a default logger and a lazily created pool
//!
//! ## Example
//!
//! ```
//! use rust_async_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Registry::new();
//! let sink = Arc::new(MemorySink::new());
//! let logger = registry
//!     .create_async_logger("app", vec![sink.clone()], OverflowPolicy::Block)
//!     .unwrap();
//!
//! rust_async_logger::info!(logger, "listening on port {}", 8080).unwrap();
//!
//! registry.shutdown(); // drains pending records and joins the workers
//! assert_eq!(sink.line_count(), 1);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        AsyncLogger, ErrorHandler, Formatter, JsonFormatter, Log, LogLevel, LogRecord, Logger,
        LoggerBuilder, LoggerError, LoggerPtr, OverflowPolicy, PatternFormatter, PoolMetrics,
        Registry, RegistryConfig, Result, Sink, SinkPtr, ThreadPool, ThreadPoolConfig,
    };
    pub use crate::sinks::{ConsoleSink, ConsoleTarget, FileSink, MemorySink, RotatingFileSink};
}

pub use crate::core::{
    AsyncLogger, ErrorHandler, Formatter, JsonFormatter, Log, LogLevel, LogRecord, Logger,
    LoggerBuilder, LoggerError, LoggerPtr, OverflowPolicy, PatternFormatter, PoolMetrics,
    Registry, RegistryConfig, Result, Sink, SinkPtr, SourceLoc, ThreadPool, ThreadPoolConfig,
};
pub use sinks::{ConsoleSink, ConsoleTarget, FileSink, MemorySink, RotatingFileSink};
