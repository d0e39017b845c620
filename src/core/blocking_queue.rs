//! Bounded multi-producer/multi-consumer queue
//!
//! A [`RingBuffer`] behind one mutex plus two condition variables: producers
//! wait on `not_full`, consumers wait on `not_empty`. All ring state (indices,
//! overrun counter) is only touched while the mutex is held.

use super::ring_buffer::RingBuffer;
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

pub struct BlockingQueue<T> {
    ring: Mutex<RingBuffer<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// # Panics
    ///
    /// Panics if `capacity` is zero
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Mutex::new(RingBuffer::new(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    /// Enqueue, waiting for free space while the queue is full
    ///
    /// Lossless, but a saturated queue stalls the caller with no upper bound.
    pub fn enqueue(&self, item: T) {
        {
            let mut ring = self.ring.lock();
            while ring.is_full() {
                self.not_full.wait(&mut ring);
            }
            let evicted = ring.push_back(item);
            debug_assert!(evicted.is_none());
        }
        self.not_empty.notify_one();
    }

    /// Enqueue without waiting, overwriting the oldest entry if the queue is full
    pub fn enqueue_nowait(&self, item: T) {
        let evicted = {
            let mut ring = self.ring.lock();
            ring.push_back(item)
        };
        self.not_empty.notify_one();
        // The evicted entry may hold the last handle to a logger; release it outside the lock.
        drop(evicted);
    }

    /// Wait up to `timeout` for an item
    ///
    /// Returns `None` on timeout; callers are expected to retry.
    pub fn dequeue_for(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let item = {
            let mut ring = self.ring.lock();
            while ring.is_empty() {
                if self.not_empty.wait_until(&mut ring, deadline).timed_out() {
                    if ring.is_empty() {
                        return None;
                    }
                    break;
                }
            }
            ring.pop_front()
        };
        self.not_full.notify_one();
        Some(item)
    }

    /// Number of entries evicted by [`BlockingQueue::enqueue_nowait`] so far
    pub fn overrun_count(&self) -> u64 {
        self.ring.lock().overrun_count()
    }

    /// Number of entries currently buffered
    pub fn size(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.ring.lock().capacity()
    }
}
