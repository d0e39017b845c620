//! Logging macros for ergonomic log message formatting.
//!
//! These macros work like `println!` and `format!`, record the call site
//! (`file!()`, `line!()`, `module_path!()`) and accept any logger handle:
//! `Logger`, `Arc<AsyncLogger>`, `Arc<dyn Log>` or references to them.
//! Formatting is skipped entirely when the level is filtered out.
//!
//! Each macro evaluates to the `Result<()>` of the logging call.
//!
//! # Examples
//!
//! ```
//! use rust_async_logger::prelude::*;
//! use rust_async_logger::info;
//!
//! let logger = Logger::new("server");
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a message at a runtime level.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_async_logger::log;
/// log!(logger, LogLevel::Info, "Simple message")?;
/// log!(logger, LogLevel::Error, "Error code: {}", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::core::Log as _;
        $logger.log_at(
            $level,
            ::core::option::Option::Some($crate::core::SourceLoc::new(
                file!(),
                line!(),
                module_path!(),
            )),
            format_args!($($arg)+),
        )
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_async_logger::trace;
/// trace!(logger, "Entering function: calculate()")?;
/// trace!(logger, "Variable value: {}", 42)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_async_logger::info;
/// info!(logger, "Processing {} items", 100)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// # Examples
///
/// ```
/// # use rust_async_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_async_logger::critical;
/// critical!(logger, "Database connection lost: {}", "timeout")?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
