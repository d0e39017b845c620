//! File sink implementation

use crate::core::sink::{FormatState, SinkLevel};
use crate::core::{Formatter, LogLevel, LogRecord, LoggerError, PatternFormatter, Result, Sink};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct FileState {
    format: FormatState,
    writer: BufWriter<File>,
}

pub struct FileSink {
    path: PathBuf,
    level: SinkLevel,
    state: Mutex<FileState>,
}

impl FileSink {
    /// Open `path` for appending, creating it (and its parent directory) if needed
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_truncate(path, false)
    }

    /// Open `path`, discarding existing content when `truncate` is set
    pub fn with_truncate(path: impl Into<PathBuf>, truncate: bool) -> Result<Self> {
        let path = path.into();
        let file = open_log_file(&path, truncate)?;

        Ok(Self {
            path,
            level: SinkLevel::new(LogLevel::Trace),
            state: Mutex::new(FileState {
                format: FormatState::new(Box::new(PatternFormatter::default())),
                writer: BufWriter::new(file),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn open_log_file(path: &Path, truncate: bool) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LoggerError::io_operation(
                "create log directory",
                format!("Failed to create directory '{}'", parent.display()),
                e,
            )
        })?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    options.open(path).map_err(|e| {
        LoggerError::file_sink(path.display().to_string(), format!("Failed to open: {}", e))
    })
}

impl Sink for FileSink {
    fn log(&self, record: &LogRecord<'_>) -> Result<()> {
        let mut state = self.state.lock();
        let FileState { format, writer } = &mut *state;
        let line = format.render(record);
        writer.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.state.lock().writer.flush()?;
        Ok(())
    }

    fn set_formatter(&self, formatter: Box<dyn Formatter>) {
        self.state.lock().format.formatter = formatter;
    }

    fn level(&self) -> LogLevel {
        self.level.get()
    }

    fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.state.get_mut().writer.flush();
    }
}
