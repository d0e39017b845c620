//! Sink trait for log output destinations

use super::{error::Result, formatter::Formatter, log_level::LogLevel, log_record::LogRecord};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// An output destination
///
/// Sinks are shared between loggers and called from worker threads, so every
/// method takes `&self` and implementations serialize writes internally.
pub trait Sink: Send + Sync {
    /// Write one record. Errors are reported to the caller, which decides
    /// whether they are fatal.
    fn log(&self, record: &LogRecord<'_>) -> Result<()>;

    fn flush(&self) -> Result<()>;

    fn set_formatter(&self, formatter: Box<dyn Formatter>);

    fn level(&self) -> LogLevel;

    fn set_level(&self, level: LogLevel);

    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.level() && level != LogLevel::Off
    }

    fn set_pattern(&self, pattern: &str) {
        self.set_formatter(Box::new(super::pattern_formatter::PatternFormatter::new(pattern)));
    }

    fn name(&self) -> &str;
}

pub type SinkPtr = Arc<dyn Sink>;

/// Level threshold shared by the built-in sinks
#[derive(Debug)]
pub(crate) struct SinkLevel(AtomicU8);

impl SinkLevel {
    pub(crate) fn new(level: LogLevel) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    pub(crate) fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, level: LogLevel) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}

/// Formatter slot plus a reusable line buffer, guarded together with the writer
pub(crate) struct FormatState {
    pub(crate) formatter: Box<dyn Formatter>,
    pub(crate) line: String,
}

impl FormatState {
    pub(crate) fn new(formatter: Box<dyn Formatter>) -> Self {
        Self {
            formatter,
            line: String::with_capacity(256),
        }
    }

    /// Render `record` into the internal buffer and return it
    pub(crate) fn render(&mut self, record: &LogRecord<'_>) -> &str {
        self.line.clear();
        self.formatter.format(record, &mut self.line);
        &self.line
    }
}
