//! Basic logger usage example
//!
//! Demonstrates synchronous logging to a colored console sink and level filtering.
//!
//! Run with: cargo run --example basic_usage

use rust_async_logger::prelude::*;
use rust_async_logger::{info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Async Logger - Basic Usage Example ===\n");

    // Create a synchronous logger writing to colored stdout
    let logger = Logger::builder("basic")
        .sink(Arc::new(ConsoleSink::stdout_color()))
        .level(LogLevel::Trace)
        .build();

    // Log messages at different levels
    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.critical("This is a critical message")?;

    println!("\n2. Logging with different minimum levels:");

    logger.set_level(LogLevel::Info);
    println!("   Minimum level set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)")?;
    logger.debug("Debug message (hidden)")?;
    info!(logger, "Info message (visible), {} of {}", 1, 2)?;
    warn!(logger, "Warning message (visible), {} of {}", 2, 2)?;

    println!("\n3. Custom pattern:");
    for sink in logger.sinks() {
        sink.set_pattern("%H:%M:%S.%e %L %n: %v");
    }
    logger.info("Rendered with a custom pattern")?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
