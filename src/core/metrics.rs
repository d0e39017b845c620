//! Thread pool metrics for observability
//!
//! Counters describing how many envelopes went through a pool and how many of
//! them failed. Queue overruns are tracked by the queue itself, see
//! [`ThreadPool::overrun_count`](super::thread_pool::ThreadPool::overrun_count).

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for worker pool observability
///
/// # Example
///
/// ```
/// use rust_async_logger::PoolMetrics;
///
/// let metrics = PoolMetrics::new();
/// metrics.record_posted();
/// metrics.record_processed();
///
/// assert_eq!(metrics.posted(), 1);
/// assert_eq!(metrics.in_flight(), 0);
/// ```
#[derive(Debug)]
pub struct PoolMetrics {
    /// Log envelopes handed to the queue
    posted: AtomicU64,

    /// Log envelopes dispatched by a worker
    processed: AtomicU64,

    /// Flush envelopes dispatched by a worker
    flushes: AtomicU64,

    /// Dispatches that returned a sink error
    sink_errors: AtomicU64,

    /// Dispatches that panicked inside a sink or error handler
    worker_panics: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            posted: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            sink_errors: AtomicU64::new(0),
            worker_panics: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_errors(&self) -> u64 {
        self.sink_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn worker_panics(&self) -> u64 {
        self.worker_panics.load(Ordering::Relaxed)
    }

    /// Posted log envelopes not yet processed (includes overwritten ones)
    pub fn in_flight(&self) -> u64 {
        self.posted().saturating_sub(self.processed())
    }

    #[inline]
    pub fn record_posted(&self) -> u64 {
        self.posted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_processed(&self) -> u64 {
        self.processed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_error(&self) -> u64 {
        self.sink_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_worker_panic(&self) -> u64 {
        self.worker_panics.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.posted.store(0, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.sink_errors.store(0, Ordering::Relaxed);
        self.worker_panics.store(0, Ordering::Relaxed);
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for PoolMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            posted: AtomicU64::new(self.posted()),
            processed: AtomicU64::new(self.processed()),
            flushes: AtomicU64::new(self.flushes()),
            sink_errors: AtomicU64::new(self.sink_errors()),
            worker_panics: AtomicU64::new(self.worker_panics()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = PoolMetrics::new();
        assert_eq!(metrics.posted(), 0);
        assert_eq!(metrics.processed(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.sink_errors(), 0);
        assert_eq!(metrics.worker_panics(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = PoolMetrics::new();
        assert_eq!(metrics.record_posted(), 0);
        assert_eq!(metrics.record_posted(), 1);
        assert_eq!(metrics.posted(), 2);
    }

    #[test]
    fn test_in_flight() {
        let metrics = PoolMetrics::new();
        for _ in 0..5 {
            metrics.record_posted();
        }
        metrics.record_processed();
        metrics.record_processed();
        assert_eq!(metrics.in_flight(), 3);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = PoolMetrics::new();
        metrics.record_posted();
        metrics.record_sink_error();
        metrics.record_worker_panic();

        metrics.reset();

        assert_eq!(metrics.posted(), 0);
        assert_eq!(metrics.sink_errors(), 0);
        assert_eq!(metrics.worker_panics(), 0);
    }

    #[test]
    fn test_metrics_snapshot_is_independent() {
        let metrics = PoolMetrics::new();
        metrics.record_flush();

        let snapshot = metrics.clone();
        metrics.record_flush();

        assert_eq!(metrics.flushes(), 2);
        assert_eq!(snapshot.flushes(), 1);
    }
}
