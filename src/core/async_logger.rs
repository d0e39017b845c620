//! Asynchronous logger
//!
//! The front end filters by level on the calling thread, copies the record into
//! an envelope and posts it to the pool. A worker later runs the back end, which
//! is the same sink fan-out a synchronous [`Logger`](super::logger::Logger) runs.

use super::{
    error::{LoggerError, Result},
    log_record::LogRecord,
    logger::{Log, LoggerCore},
    overflow_policy::OverflowPolicy,
    sink::SinkPtr,
    thread_pool::ThreadPool,
};
use std::fmt;
use std::sync::{Arc, Weak};

/// Logger that hands records to a shared [`ThreadPool`]
///
/// The logger only holds a weak reference to its pool. Once the pool is gone,
/// logging and flushing return [`LoggerError::PoolUnavailable`].
///
/// # Example
///
/// ```
/// use rust_async_logger::prelude::*;
/// use std::sync::Arc;
///
/// let pool = Arc::new(ThreadPool::new(1024, 1).unwrap());
/// let sink = Arc::new(MemorySink::new());
/// let logger = AsyncLogger::new("async", vec![sink.clone()], &pool, OverflowPolicy::Block);
///
/// logger.info("hello").unwrap();
/// drop(pool); // drains the queue and joins the workers
/// assert_eq!(sink.line_count(), 1);
/// ```
pub struct AsyncLogger {
    core: LoggerCore,
    thread_pool: Weak<ThreadPool>,
    overflow_policy: OverflowPolicy,
    self_ref: Weak<AsyncLogger>,
}

impl AsyncLogger {
    pub fn new(
        name: impl Into<String>,
        sinks: Vec<SinkPtr>,
        pool: &Arc<ThreadPool>,
        policy: OverflowPolicy,
    ) -> Arc<Self> {
        Self::from_core(LoggerCore::new(name, sinks), Arc::downgrade(pool), policy)
    }

    pub(crate) fn from_core(
        core: LoggerCore,
        thread_pool: Weak<ThreadPool>,
        overflow_policy: OverflowPolicy,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            core,
            thread_pool,
            overflow_policy,
            self_ref: self_ref.clone(),
        })
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    /// The pool this logger posts to, if it is still alive
    pub fn thread_pool(&self) -> Option<Arc<ThreadPool>> {
        self.thread_pool.upgrade()
    }

    fn pool(&self) -> Result<Arc<ThreadPool>> {
        self.thread_pool
            .upgrade()
            .ok_or_else(|| LoggerError::pool_unavailable(self.core.name()))
    }

    /// Strong handle stored in envelopes so the logger outlives pending work
    fn handle(&self) -> Result<Arc<AsyncLogger>> {
        self.self_ref
            .upgrade()
            .ok_or_else(|| LoggerError::other(format!("Logger '{}' is being dropped", self.core.name())))
    }

    /// Worker-side delivery of one record
    pub(crate) fn backend_log(&self, record: &LogRecord<'_>) -> Result<()> {
        self.core.fan_out(record)
    }

    /// Worker-side flush of every sink
    pub(crate) fn backend_flush(&self) -> Result<()> {
        self.core.flush_sinks()
    }
}

impl Log for AsyncLogger {
    fn core(&self) -> &LoggerCore {
        &self.core
    }

    fn sink_it(&self, record: &LogRecord<'_>) -> Result<()> {
        let pool = self.pool()?;
        let handle = self.handle()?;
        match self.overflow_policy {
            OverflowPolicy::Block => pool.post(handle, record),
            OverflowPolicy::Overwrite => pool.post_nowait(handle, record),
        }
        Ok(())
    }

    /// Post a flush request; returns once it is queued, not once it ran
    fn flush(&self) -> Result<()> {
        let pool = self.pool()?;
        pool.post_flush(self.handle()?);
        Ok(())
    }
}

impl fmt::Debug for AsyncLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncLogger")
            .field("core", &self.core)
            .field("overflow_policy", &self.overflow_policy)
            .field("pool_alive", &(self.thread_pool.strong_count() > 0))
            .finish()
    }
}
