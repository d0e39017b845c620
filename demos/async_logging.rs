//! Async logging example
//!
//! Demonstrates async loggers sharing a worker pool, both overflow policies and
//! multi-threaded producers.
//!
//! Run with: cargo run --example async_logging

use rust_async_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Async Logger - Async Logging Example ===\n");

    let registry = Registry::new();
    registry.init_thread_pool(1000, 2)?;

    // Console output plus a file, both written on worker threads
    let logger = registry.create_async_logger(
        "async",
        vec![
            Arc::new(ConsoleSink::stdout_color()),
            Arc::new(FileSink::with_truncate("async_test.log", true)?),
        ],
        OverflowPolicy::Block,
    )?;

    println!("1. High-performance async logging:");
    for i in 0..100 {
        logger.log_fmt(LogLevel::Info, format_args!("Message #{}", i))?;
    }
    println!("   Logged 100 messages asynchronously");

    println!("\n2. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || -> Result<()> {
                for i in 0..20 {
                    logger.log_fmt(
                        LogLevel::Info,
                        format_args!("Thread {} - Message {}", thread_id, i),
                    )?;
                    thread::sleep(Duration::from_millis(10));
                }
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        if let Ok(Err(e)) = handle.join() {
            eprintln!("Producer failed: {}", e);
        }
    }
    println!("   5 threads logged 20 messages each");

    println!("\n3. Overwrite policy on a tiny queue:");
    let pool = Arc::new(ThreadPool::new_paused(8, 1)?);
    let lossy = Logger::builder("lossy")
        .sink(Arc::new(MemorySink::new()))
        .build_async(&pool, OverflowPolicy::Overwrite);
    for i in 0..100 {
        lossy.log_fmt(LogLevel::Info, format_args!("burst {}", i))?;
    }
    println!("   {} of 100 records were overwritten", pool.overrun_count());
    pool.start()?;
    drop(pool);

    // Drains every queued record and joins the workers
    registry.shutdown();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'async_test.log' for file output");

    Ok(())
}
