//! Core logger types and traits

pub mod async_logger;
pub mod async_msg;
pub mod blocking_queue;
pub mod config;
pub mod error;
pub mod formatter;
pub mod json_formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod pattern_formatter;
pub mod registry;
pub mod ring_buffer;
pub mod sink;
pub mod thread_pool;

pub use async_logger::AsyncLogger;
pub use async_msg::{AsyncMsg, AsyncMsgKind};
pub use blocking_queue::BlockingQueue;
pub use config::{RegistryConfig, ThreadPoolConfig};
pub use error::{LoggerError, Result};
pub use formatter::Formatter;
pub use json_formatter::JsonFormatter;
pub use log_level::LogLevel;
pub use log_record::{current_thread_id, LogRecord, OwnedLogRecord, SourceLoc};
pub use logger::{ErrorHandler, Log, Logger, LoggerBuilder, LoggerCore};
pub use metrics::PoolMetrics;
pub use overflow_policy::OverflowPolicy;
pub use pattern_formatter::{PatternFormatter, DEFAULT_PATTERN};
pub use registry::{LoggerPtr, Registry, DEFAULT_LOGGER_NAME};
pub use ring_buffer::RingBuffer;
pub use sink::{Sink, SinkPtr};
pub use thread_pool::{
    ThreadPool, DEFAULT_QUEUE_SIZE, DEFAULT_THREAD_COUNT, MAX_QUEUE_SIZE, MAX_THREAD_COUNT,
    WORKER_POLL_INTERVAL,
};
