//! Property-based tests for rust_async_logger using proptest

use proptest::prelude::*;
use rust_async_logger::core::{BlockingQueue, RingBuffer};
use rust_async_logger::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Critical),
        Just(LogLevel::Off),
    ]
}

#[derive(Debug, Clone)]
enum RingOp {
    Push(u32),
    Pop,
}

fn ring_ops() -> impl Strategy<Value = Vec<RingOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<u32>().prop_map(RingOp::Push),
            1 => Just(RingOp::Pop),
        ],
        0..200,
    )
}

// ============================================================================
// RingBuffer Tests
// ============================================================================

proptest! {
    /// Size never exceeds capacity, overrun never decreases, and the buffer
    /// behaves like a deque that drops its front when full
    #[test]
    fn test_ring_buffer_matches_model(capacity in 1usize..16, ops in ring_ops()) {
        let mut ring = RingBuffer::new(capacity);
        let mut model = VecDeque::new();
        let mut model_overrun = 0u64;
        let mut last_overrun = 0u64;

        for op in ops {
            match op {
                RingOp::Push(value) => {
                    let evicted = ring.push_back(value);
                    if model.len() == capacity {
                        prop_assert_eq!(evicted, model.pop_front());
                        model_overrun += 1;
                    } else {
                        prop_assert_eq!(evicted, None);
                    }
                    model.push_back(value);
                }
                RingOp::Pop => {
                    if let Some(expected) = model.pop_front() {
                        prop_assert_eq!(ring.pop_front(), expected);
                    }
                }
            }

            prop_assert!(ring.len() <= capacity);
            prop_assert_eq!(ring.len(), model.len());
            prop_assert_eq!(ring.is_empty(), model.is_empty());
            prop_assert_eq!(ring.is_full(), model.len() == capacity);
            prop_assert!(ring.overrun_count() >= last_overrun);
            last_overrun = ring.overrun_count();
        }
        prop_assert_eq!(ring.overrun_count(), model_overrun);
    }

    /// Non-blocking enqueues into a queue nobody drains: overrun equals
    /// produced minus what is left to observe
    #[test]
    fn test_queue_overrun_accounting(capacity in 1usize..32, produced in 0u64..200) {
        let queue = BlockingQueue::new(capacity);
        for i in 0..produced {
            queue.enqueue_nowait(i);
        }

        let mut observed = Vec::new();
        while let Some(item) = queue.dequeue_for(Duration::from_millis(0)) {
            observed.push(item);
        }

        prop_assert_eq!(queue.overrun_count(), produced - observed.len() as u64);
        let first_kept = produced.saturating_sub(capacity as u64);
        prop_assert_eq!(observed, (first_kept..produced).collect::<Vec<_>>());
    }
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// LogLevel string conversions roundtrip
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        let parsed: LogLevel = level.long_name().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// LogLevel ordering agrees with the numeric representation
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }

    /// A logger emits exactly when the record level passes both thresholds
    #[test]
    fn test_level_filter(logger_level in any_level(), sink_level in any_level(), level in any_level()) {
        let sink = Arc::new(MemorySink::new());
        sink.set_level(sink_level);
        let logger = Logger::builder("prop").level(logger_level).sink(sink.clone()).build();

        logger.log(level, "x").unwrap();

        let expected = level != LogLevel::Off && level >= logger_level && level >= sink_level;
        prop_assert_eq!(sink.line_count(), usize::from(expected));
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// Any pattern renders without panicking and yields exactly one line ending
    #[test]
    fn test_pattern_never_panics(pattern in "[%a-zA-Z \\[\\]:]{0,24}", payload in "[a-zA-Z0-9 ]{0,40}") {
        let mut formatter = PatternFormatter::new(&pattern);
        let record = LogRecord::new("prop", LogLevel::Info, &payload);
        let line = formatter.render(&record);
        prop_assert!(line.ends_with('\n'));
    }

    /// %v reproduces the payload verbatim
    #[test]
    fn test_payload_flag_verbatim(payload in "\\PC{0,64}") {
        let mut formatter = PatternFormatter::new("%v");
        let record = LogRecord::new("prop", LogLevel::Info, &payload);
        prop_assert_eq!(formatter.render(&record), format!("{}\n", payload));
    }

    /// JSON output is always valid JSON carrying the payload
    #[test]
    fn test_json_always_valid(payload in "\\PC{0,64}", level in any_level()) {
        let mut formatter = JsonFormatter::new();
        let record = LogRecord::new("prop", level, &payload);
        let line = formatter.render(&record);
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        prop_assert_eq!(value["message"].as_str(), Some(payload.as_str()));
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

proptest! {
    /// Pool config validation agrees with pool construction
    #[test]
    fn test_pool_config_validation(queue_size in 0usize..2_000_000, thread_count in 0usize..1_100) {
        let config = ThreadPoolConfig::new(queue_size, thread_count);
        let valid = (1..=1_000_000).contains(&queue_size) && (1..=1000).contains(&thread_count);
        prop_assert_eq!(config.validate().is_ok(), valid);
        if !valid {
            prop_assert!(ThreadPool::new_paused(queue_size, thread_count).is_err());
        }
    }
}
