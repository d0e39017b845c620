//! Worker pool draining the shared envelope queue
//!
//! Producers post envelopes into one bounded [`BlockingQueue`]; every worker
//! polls it with a short timeout and dispatches whatever it receives to the
//! envelope's destination logger. Dropping the pool posts one shutdown
//! sentinel per worker behind any pending work, then joins every worker.

use super::{
    async_logger::AsyncLogger,
    async_msg::AsyncMsg,
    blocking_queue::BlockingQueue,
    config::ThreadPoolConfig,
    error::{LoggerError, Result},
    log_record::LogRecord,
    logger::Log,
    metrics::PoolMetrics,
};
use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long an idle worker waits on the queue before polling again
pub const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub const DEFAULT_QUEUE_SIZE: usize = 8192;
pub const DEFAULT_THREAD_COUNT: usize = 1;
pub const MAX_QUEUE_SIZE: usize = 1_000_000;
pub const MAX_THREAD_COUNT: usize = 1000;

/// Fixed-size pool of worker threads sharing one bounded queue
pub struct ThreadPool {
    queue: Arc<BlockingQueue<AsyncMsg>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    thread_count: usize,
    metrics: Arc<PoolMetrics>,
}

impl ThreadPool {
    /// Create a pool with `queue_size` slots and `thread_count` running workers
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `queue_size` is outside
    /// `1..=MAX_QUEUE_SIZE` or `thread_count` outside `1..=MAX_THREAD_COUNT`,
    /// or an I/O error if a worker thread cannot be spawned.
    pub fn new(queue_size: usize, thread_count: usize) -> Result<Self> {
        let pool = Self::new_paused(queue_size, thread_count)?;
        pool.start()?;
        Ok(pool)
    }

    /// Create a pool whose workers are not started yet
    ///
    /// Envelopes posted before [`start`](Self::start) wait in the queue (or
    /// overwrite each other, depending on the posting logger's policy).
    pub fn new_paused(queue_size: usize, thread_count: usize) -> Result<Self> {
        if queue_size == 0 || queue_size > MAX_QUEUE_SIZE {
            return Err(LoggerError::config(
                "ThreadPool",
                format!(
                    "queue_size must be between 1 and {}, got {}",
                    MAX_QUEUE_SIZE, queue_size
                ),
            ));
        }
        if thread_count == 0 || thread_count > MAX_THREAD_COUNT {
            return Err(LoggerError::config(
                "ThreadPool",
                format!(
                    "thread_count must be between 1 and {}, got {}",
                    MAX_THREAD_COUNT, thread_count
                ),
            ));
        }

        Ok(Self {
            queue: Arc::new(BlockingQueue::new(queue_size)),
            workers: Mutex::new(Vec::with_capacity(thread_count)),
            thread_count,
            metrics: Arc::new(PoolMetrics::new()),
        })
    }

    pub fn from_config(config: &ThreadPoolConfig) -> Result<Self> {
        Self::new(config.queue_size, config.thread_count)
    }

    /// Spawn the workers; does nothing if they are already running
    ///
    /// If spawning fails partway, the workers spawned so far are stopped and
    /// joined before the error is returned, so `start` can be retried.
    pub fn start(&self) -> Result<()> {
        self.start_with(|index| self.spawn_worker(index))
    }

    fn start_with(
        &self,
        mut spawn: impl FnMut(usize) -> io::Result<JoinHandle<()>>,
    ) -> Result<()> {
        let mut workers = self.workers.lock();
        if !workers.is_empty() {
            return Ok(());
        }

        let mut spawned = Vec::with_capacity(self.thread_count);
        for index in 0..self.thread_count {
            match spawn(index) {
                Ok(handle) => spawned.push(handle),
                Err(e) => {
                    stop_workers(&self.queue, spawned);
                    return Err(LoggerError::io_operation(
                        "spawn worker thread",
                        format!("Failed to spawn worker {} of {}", index, self.thread_count),
                        e,
                    ));
                }
            }
        }
        *workers = spawned;
        Ok(())
    }

    fn spawn_worker(&self, index: usize) -> io::Result<JoinHandle<()>> {
        let queue = Arc::clone(&self.queue);
        let metrics = Arc::clone(&self.metrics);
        thread::Builder::new()
            .name(format!("async-log-worker-{}", index))
            .spawn(move || worker_loop(&queue, &metrics))
    }

    pub fn is_running(&self) -> bool {
        !self.workers.lock().is_empty()
    }

    /// Queue a log envelope, waiting while the queue is full
    pub fn post(&self, logger: Arc<AsyncLogger>, record: &LogRecord<'_>) {
        self.metrics.record_posted();
        self.queue.enqueue(AsyncMsg::log(logger, record));
    }

    /// Queue a log envelope, evicting the oldest pending one if the queue is full
    pub fn post_nowait(&self, logger: Arc<AsyncLogger>, record: &LogRecord<'_>) {
        self.metrics.record_posted();
        self.queue.enqueue_nowait(AsyncMsg::log(logger, record));
    }

    /// Queue a flush request for `logger`
    ///
    /// Flush requests always wait for room so they are never overwritten.
    pub fn post_flush(&self, logger: Arc<AsyncLogger>) {
        self.queue.enqueue(AsyncMsg::flush(logger));
    }

    /// Envelopes evicted by overwrite posts since the pool was created
    pub fn overrun_count(&self) -> u64 {
        self.queue.overrun_count()
    }

    /// Envelopes currently waiting in the queue
    pub fn queue_size(&self) -> usize {
        self.queue.size()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("queue_size", &self.queue_size())
            .field("queue_capacity", &self.queue_capacity())
            .field("thread_count", &self.thread_count)
            .field("overrun_count", &self.overrun_count())
            .finish()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        let workers = std::mem::take(self.workers.get_mut());
        stop_workers(&self.queue, workers);
    }
}

thread_local! {
    /// Set on a worker that dropped its own pool
    static RETIRING: Cell<bool> = const { Cell::new(false) };
}

/// Queue one sentinel per worker behind pending work, then join them
///
/// When called from one of the workers themselves, that worker gets no
/// sentinel and is not joined: it exits after its current envelope, and
/// whatever is still queued then is only handled by the other workers.
fn stop_workers(queue: &BlockingQueue<AsyncMsg>, workers: Vec<JoinHandle<()>>) {
    let current = thread::current().id();
    let (own, others): (Vec<_>, Vec<_>) = workers
        .into_iter()
        .partition(|handle| handle.thread().id() == current);

    if !own.is_empty() {
        RETIRING.with(|retiring| retiring.set(true));
        eprintln!("[LOGGER WARNING] Thread pool dropped from its own worker; not joining it");
    }

    // Never overwritten, so every remaining worker is guaranteed its sentinel
    for _ in 0..others.len() {
        queue.enqueue(AsyncMsg::Shutdown);
    }

    for handle in others {
        if let Err(e) = handle.join() {
            eprintln!(
                "[LOGGER ERROR] Async worker thread panicked during shutdown: {:?}",
                e
            );
        }
    }
}

fn worker_loop(queue: &BlockingQueue<AsyncMsg>, metrics: &PoolMetrics) {
    while process_next_msg(queue, metrics) {
        if RETIRING.with(Cell::get) {
            break;
        }
    }
}

/// Handle at most one envelope; returns false once a shutdown sentinel is seen
fn process_next_msg(queue: &BlockingQueue<AsyncMsg>, metrics: &PoolMetrics) -> bool {
    let msg = match queue.dequeue_for(WORKER_POLL_INTERVAL) {
        Some(msg) => msg,
        None => return true,
    };

    match msg {
        AsyncMsg::Log { logger, record } => {
            dispatch(&logger, metrics, || logger.backend_log(&record.as_record()));
            metrics.record_processed();
            true
        }
        AsyncMsg::Flush { logger } => {
            dispatch(&logger, metrics, || logger.backend_flush());
            metrics.record_flush();
            true
        }
        AsyncMsg::Shutdown => false,
    }
}

/// Run one back-end call and route any failure to the logger's error handler
///
/// A panic in a sink or in the handler must not kill the worker: every
/// shutdown sentinel has to be consumed for the pool's drop to return.
fn dispatch(logger: &AsyncLogger, metrics: &PoolMetrics, f: impl FnOnce() -> Result<()>) {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        if let Err(e) = f() {
            metrics.record_sink_error();
            logger.core().report_error(&e);
        }
    }));

    if let Err(panic_info) = outcome {
        metrics.record_worker_panic();
        eprintln!(
            "[LOGGER ERROR] Logger '{}' panicked on worker thread: {}",
            logger.name(),
            LoggerError::from_panic(panic_info.as_ref())
        );
    }
}
