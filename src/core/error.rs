//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// The worker pool a logger was bound to has been torn down
    #[error("Thread pool for logger '{logger}' is no longer available")]
    PoolUnavailable { logger: String },

    /// A logger with the same name is already registered
    #[error("Logger with name '{name}' already exists")]
    LoggerAlreadyExists { name: String },

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// File rotation error
    #[error("File rotation failed for '{path}': {message}")]
    FileRotationError { path: String, message: String },

    /// A sink panicked while writing or flushing
    #[error("Sink panicked: {0}")]
    SinkPanicked(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a "destination unavailable" error for a logger whose pool is gone
    pub fn pool_unavailable(logger: impl Into<String>) -> Self {
        LoggerError::PoolUnavailable {
            logger: logger.into(),
        }
    }

    pub fn logger_exists(name: impl Into<String>) -> Self {
        LoggerError::LoggerAlreadyExists { name: name.into() }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file rotation error
    pub fn file_rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileRotationError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a `SinkPanicked` error from a `catch_unwind` payload
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        LoggerError::SinkPanicked(msg)
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for configuration errors raised at construction time
    pub fn is_config(&self) -> bool {
        matches!(self, LoggerError::InvalidConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("ThreadPool", "thread count must be in [1, 1000]");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(err.is_config());

        let err = LoggerError::pool_unavailable("net");
        assert!(matches!(err, LoggerError::PoolUnavailable { .. }));
        assert!(!err.is_config());

        let err = LoggerError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileSinkError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::pool_unavailable("net");
        assert_eq!(
            err.to_string(),
            "Thread pool for logger 'net' is no longer available"
        );

        let err = LoggerError::file_rotation("/var/log/app.log", "Disk full");
        assert_eq!(
            err.to_string(),
            "File rotation failed for '/var/log/app.log': Disk full"
        );

        let err = LoggerError::logger_exists("main");
        assert_eq!(err.to_string(), "Logger with name 'main' already exists");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("writing log file", "cannot write to file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing log file"));
        assert!(err.to_string().contains("cannot write to file"));
    }

    #[test]
    fn test_from_panic_payload() {
        let payload = std::panic::catch_unwind(|| panic!("disk on fire")).unwrap_err();
        let err = LoggerError::from_panic(payload.as_ref());
        assert_eq!(err.to_string(), "Sink panicked: disk on fire");
    }
}
