//! File logging example
//!
//! Demonstrates plain, rotating and JSON file output configured from JSON.
//!
//! Run with: cargo run --example file_logging

use rust_async_logger::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Async Logger - File Logging Example ===\n");

    let config = RegistryConfig::from_json(
        r#"{
            "thread_pool": { "queue_size": 4096, "thread_count": 1 },
            "level": "debug",
            "flush_level": "error"
        }"#,
    )?;
    let registry = Registry::from_config(config)?;

    println!("1. Logging to a plain file:");
    let app = registry.file_logger("app", "application.log", true)?;
    app.info("Application started")?;
    app.debug("Loading configuration...")?;
    app.warn("Using default settings for some options")?;
    app.error("Failed to load optional plugin")?;

    println!("\n2. Logging to a rotating file (async):");
    let rotating = registry.async_rotating_file(
        "rotating",
        "rotating.log",
        4 * 1024,
        3,
        OverflowPolicy::Block,
    )?;
    for i in 1..=200 {
        rotating.log_fmt(LogLevel::Info, format_args!("Processing item {}/200", i))?;
    }

    println!("\n3. JSON lines:");
    let json_sink = Arc::new(FileSink::with_truncate("application.jsonl", true)?);
    json_sink.set_formatter(Box::new(JsonFormatter::new().with_source(true)));
    let json = registry.create_logger("json", vec![json_sink])?;
    rust_async_logger::info!(json, "user {} logged in", 42)?;

    registry.shutdown();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log', 'rotating.log*' and 'application.jsonl'");

    Ok(())
}
