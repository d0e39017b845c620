//! Log record types
//!
//! [`LogRecord`] is the borrowed snapshot built on the caller thread: it points at
//! the logger name and at a payload that usually lives in the caller's stack frame.
//! [`OwnedLogRecord`] copies the payload so the record can cross to a worker thread.

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

// Thread-local cache so each thread only allocates its id once
thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Small, stable numeric id of the calling thread
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        let id = cache.get();
        if id != 0 {
            return id;
        }
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        cache.set(id);
        id
    })
}

/// Call-site information captured by the logging macros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub file: &'static str,
    pub line: u32,
    pub function: &'static str,
}

impl SourceLoc {
    pub const fn new(file: &'static str, line: u32, function: &'static str) -> Self {
        Self {
            file,
            line,
            function,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.line == 0
    }
}

/// Immutable snapshot of one log event
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub logger_name: &'a str,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub thread_id: u64,
    pub source: Option<SourceLoc>,
    pub payload: &'a str,
}

impl<'a> LogRecord<'a> {
    pub fn new(logger_name: &'a str, level: LogLevel, payload: &'a str) -> Self {
        Self {
            logger_name,
            level,
            timestamp: Utc::now(),
            thread_id: current_thread_id(),
            source: None,
            payload,
        }
    }

    pub fn with_source(mut self, source: SourceLoc) -> Self {
        self.source = Some(source);
        self
    }
}

/// A [`LogRecord`] whose payload is held in record-owned storage
///
/// The logger name is shared with the owning logger. The borrowed view returned
/// by [`OwnedLogRecord::as_record`] always points into this record, so moving the
/// record (into the queue, out of it, across threads) can never leave the view
/// dangling on the producer's buffer.
#[derive(Debug, Clone)]
pub struct OwnedLogRecord {
    logger_name: Arc<str>,
    level: LogLevel,
    timestamp: DateTime<Utc>,
    thread_id: u64,
    source: Option<SourceLoc>,
    payload: String,
}

impl OwnedLogRecord {
    pub fn from_record(logger_name: Arc<str>, record: &LogRecord<'_>) -> Self {
        Self {
            logger_name,
            level: record.level,
            timestamp: record.timestamp,
            thread_id: record.thread_id,
            source: record.source,
            payload: record.payload.to_owned(),
        }
    }

    pub fn as_record(&self) -> LogRecord<'_> {
        LogRecord {
            logger_name: &self.logger_name,
            level: self.level,
            timestamp: self.timestamp,
            thread_id: self.thread_id,
            source: self.source,
            payload: &self.payload,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    #[inline]
    pub fn thread_id(&self) -> u64 {
        self.thread_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_id_is_stable_per_thread() {
        let a = current_thread_id();
        let b = current_thread_id();
        assert_eq!(a, b);

        let other = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn test_owned_record_outlives_source_buffer() {
        let name: Arc<str> = Arc::from("net");
        let owned = {
            let buffer = format!("payload {}", 42);
            let record = LogRecord::new("net", LogLevel::Warn, &buffer)
                .with_source(SourceLoc::new("lib.rs", 7, "net::send"));
            OwnedLogRecord::from_record(Arc::clone(&name), &record)
        };

        let view = owned.as_record();
        assert_eq!(view.payload, "payload 42");
        assert_eq!(view.logger_name, "net");
        assert_eq!(view.level, LogLevel::Warn);
        assert_eq!(view.source.map(|s| s.line), Some(7));
    }

    #[test]
    fn test_owned_record_view_points_into_self_after_move() {
        let buffer = String::from("moved around");
        let record = LogRecord::new("core", LogLevel::Info, &buffer);
        let owned = OwnedLogRecord::from_record(Arc::from("core"), &record);

        let moved = vec![owned].pop().unwrap();
        let view = moved.as_record();
        assert_eq!(view.payload, "moved around");
        assert_ne!(view.payload.as_ptr(), buffer.as_ptr());
        assert_eq!(view.payload.as_ptr(), moved.payload().as_ptr());
    }
}
