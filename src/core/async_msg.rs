//! Envelopes carried from producers to pool workers

use super::async_logger::AsyncLogger;
use super::log_record::{LogRecord, OwnedLogRecord};
use super::logger::Log;
use std::fmt;
use std::sync::Arc;

/// Kind of work an [`AsyncMsg`] asks a worker to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncMsgKind {
    Log,
    Flush,
    Shutdown,
}

/// One unit of work in the pool queue
///
/// `Log` and `Flush` hold a strong handle on their destination, so a logger
/// dropped by its owner stays alive until its last envelope is processed.
/// `Shutdown` carries nothing and tells exactly one worker to exit.
pub enum AsyncMsg {
    Log {
        logger: Arc<AsyncLogger>,
        record: OwnedLogRecord,
    },
    Flush {
        logger: Arc<AsyncLogger>,
    },
    Shutdown,
}

impl AsyncMsg {
    /// Copy `record` into a new log envelope bound to `logger`
    pub fn log(logger: Arc<AsyncLogger>, record: &LogRecord<'_>) -> Self {
        let record = OwnedLogRecord::from_record(logger.core().shared_name(), record);
        AsyncMsg::Log { logger, record }
    }

    pub fn flush(logger: Arc<AsyncLogger>) -> Self {
        AsyncMsg::Flush { logger }
    }

    pub fn kind(&self) -> AsyncMsgKind {
        match self {
            AsyncMsg::Log { .. } => AsyncMsgKind::Log,
            AsyncMsg::Flush { .. } => AsyncMsgKind::Flush,
            AsyncMsg::Shutdown => AsyncMsgKind::Shutdown,
        }
    }
}

impl fmt::Debug for AsyncMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsyncMsg::Log { logger, record } => f
                .debug_struct("Log")
                .field("logger", &logger.core().name())
                .field("record", record)
                .finish(),
            AsyncMsg::Flush { logger } => f
                .debug_struct("Flush")
                .field("logger", &logger.core().name())
                .finish(),
            AsyncMsg::Shutdown => f.write_str("Shutdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LoggerBuilder, OverflowPolicy, ThreadPool};

    #[test]
    fn test_log_envelope_owns_payload() {
        let pool = Arc::new(ThreadPool::new_paused(4, 1).unwrap());
        let logger = LoggerBuilder::new("env").build_async(&pool, OverflowPolicy::Block);

        let msg = {
            let payload = format!("value={}", 3);
            let record = LogRecord::new("env", LogLevel::Info, &payload);
            AsyncMsg::log(Arc::clone(&logger), &record)
        };

        assert_eq!(msg.kind(), AsyncMsgKind::Log);
        match msg {
            AsyncMsg::Log { record, .. } => {
                let view = record.as_record();
                assert_eq!(view.payload, "value=3");
                assert_eq!(view.logger_name, "env");
            }
            other => panic!("unexpected envelope {:?}", other),
        }
    }

    #[test]
    fn test_envelope_keeps_logger_alive() {
        let pool = Arc::new(ThreadPool::new_paused(4, 1).unwrap());
        let logger = LoggerBuilder::new("alive").build_async(&pool, OverflowPolicy::Block);
        let weak = Arc::downgrade(&logger);

        let msg = AsyncMsg::flush(logger);
        assert_eq!(msg.kind(), AsyncMsgKind::Flush);
        assert!(weak.upgrade().is_some());

        drop(msg);
        assert!(weak.upgrade().is_none());
        assert_eq!(AsyncMsg::Shutdown.kind(), AsyncMsgKind::Shutdown);
    }
}
