//! Criterion benchmarks for rust_async_logger

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_async_logger::core::{BlockingQueue, OwnedLogRecord, RingBuffer};
use rust_async_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn memory_sink() -> Arc<MemorySink> {
    let sink = Arc::new(MemorySink::new());
    sink.set_pattern("%v");
    sink
}

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_ring_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer");
    group.throughput(Throughput::Elements(1));

    group.bench_function("push_pop", |b| {
        let mut ring = RingBuffer::new(1024);
        b.iter(|| {
            ring.push_back(black_box(42u64));
            black_box(ring.pop_front())
        });
    });

    group.bench_function("push_overwrite", |b| {
        let mut ring = RingBuffer::new(64);
        for i in 0..64u64 {
            ring.push_back(i);
        }
        b.iter(|| black_box(ring.push_back(black_box(7u64))));
    });

    group.finish();
}

fn bench_blocking_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocking_queue");
    group.throughput(Throughput::Elements(1));

    group.bench_function("enqueue_dequeue", |b| {
        let queue = BlockingQueue::new(1024);
        b.iter(|| {
            queue.enqueue(black_box(1u64));
            black_box(queue.dequeue_for(Duration::from_millis(1)))
        });
    });

    group.bench_function("enqueue_nowait_full", |b| {
        let queue = BlockingQueue::new(64);
        for i in 0..64u64 {
            queue.enqueue(i);
        }
        b.iter(|| queue.enqueue_nowait(black_box(1u64)));
    });

    group.finish();
}

// ============================================================================
// Record and Formatting Benchmarks
// ============================================================================

fn bench_record_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_copy");
    let name: Arc<str> = Arc::from("bench");

    for size in [16usize, 256, 4096] {
        let payload = "x".repeat(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &payload, |b, payload| {
            b.iter(|| {
                let record = LogRecord::new("bench", LogLevel::Info, payload);
                black_box(OwnedLogRecord::from_record(Arc::clone(&name), &record))
            });
        });
    }

    group.finish();
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));
    let record = LogRecord::new("bench", LogLevel::Info, "Request processed in 12ms");

    group.bench_function("pattern_default", |b| {
        let mut formatter = PatternFormatter::default();
        let mut line = String::with_capacity(256);
        b.iter(|| {
            line.clear();
            formatter.format(black_box(&record), &mut line);
            black_box(line.len())
        });
    });

    group.bench_function("pattern_payload_only", |b| {
        let mut formatter = PatternFormatter::new("%v");
        let mut line = String::with_capacity(256);
        b.iter(|| {
            line.clear();
            formatter.format(black_box(&record), &mut line);
            black_box(line.len())
        });
    });

    group.bench_function("json", |b| {
        let mut formatter = JsonFormatter::new();
        let mut line = String::with_capacity(256);
        b.iter(|| {
            line.clear();
            formatter.format(black_box(&record), &mut line);
            black_box(line.len())
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_sync_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_logging");
    group.throughput(Throughput::Elements(1));

    let sink = memory_sink();
    let logger = Logger::with_sinks("sync", vec![sink.clone()]);

    group.bench_function("info", |b| {
        b.iter(|| {
            logger.info(black_box("Info message")).unwrap();
            // Keep the buffer from growing without bound
            if sink.line_count() > 10_000 {
                sink.clear();
            }
        });
    });

    group.finish();
}

fn bench_async_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_logging");
    group.throughput(Throughput::Elements(1));

    for policy in [OverflowPolicy::Block, OverflowPolicy::Overwrite] {
        let pool = Arc::new(ThreadPool::new(8192, 1).unwrap());
        let logger = AsyncLogger::new("async", vec![memory_sink()], &pool, policy);

        group.bench_function(BenchmarkId::new("info", policy), |b| {
            b.iter(|| logger.info(black_box("Async message")).unwrap());
        });

        drop(pool);
    }

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    for thread_count in [1usize, 2, 4, 8] {
        let messages_per_thread = 1000;
        group.throughput(Throughput::Elements((thread_count * messages_per_thread) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(thread_count),
            &thread_count,
            |b, &thread_count| {
                let pool = Arc::new(ThreadPool::new(8192, 2).unwrap());
                let logger = AsyncLogger::new("concurrent", vec![memory_sink()], &pool, OverflowPolicy::Block);

                b.iter(|| {
                    thread::scope(|scope| {
                        for _ in 0..thread_count {
                            let logger = &logger;
                            scope.spawn(move || {
                                for i in 0..messages_per_thread {
                                    logger
                                        .log_fmt(LogLevel::Info, format_args!("message {}", i))
                                        .unwrap();
                                }
                            });
                        }
                    });
                });

                drop(pool);
            },
        );
    }

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder("filter")
        .level(LogLevel::Error)
        .sink(memory_sink())
        .build();

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("This should be filtered")).unwrap());
    });

    group.bench_function("filtered_out_formatted", |b| {
        b.iter(|| {
            logger
                .log_fmt(LogLevel::Debug, format_args!("value {}", black_box(42)))
                .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ring_buffer,
    bench_blocking_queue,
    bench_record_copy,
    bench_formatting,
    bench_sync_logging,
    bench_async_logging,
    bench_concurrent_logging,
    bench_level_filtering,
);

criterion_main!(benches);
