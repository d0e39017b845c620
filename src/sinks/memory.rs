//! In-memory sink, mainly for tests and embedding

use crate::core::sink::{FormatState, SinkLevel};
use crate::core::{Formatter, LogLevel, LogRecord, PatternFormatter, Result, Sink};
use parking_lot::Mutex;

struct MemoryState {
    format: FormatState,
    buffer: String,
    records: usize,
    flush_marks: Vec<usize>,
}

/// Appends every formatted record to a growable in-memory buffer
pub struct MemorySink {
    level: SinkLevel,
    state: Mutex<MemoryState>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::with_formatter(Box::new(PatternFormatter::default()))
    }

    pub fn with_formatter(formatter: Box<dyn Formatter>) -> Self {
        Self {
            level: SinkLevel::new(LogLevel::Trace),
            state: Mutex::new(MemoryState {
                format: FormatState::new(formatter),
                buffer: String::new(),
                records: 0,
                flush_marks: Vec::new(),
            }),
        }
    }

    /// Snapshot of everything written so far
    pub fn contents(&self) -> String {
        self.state.lock().buffer.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.lock().buffer.lines().map(str::to_owned).collect()
    }

    pub fn line_count(&self) -> usize {
        self.state.lock().buffer.lines().count()
    }

    /// Number of times `flush` was called
    pub fn flush_count(&self) -> u64 {
        self.state.lock().flush_marks.len() as u64
    }

    /// For each flush, how many records had been written when it arrived
    pub fn flush_marks(&self) -> Vec<usize> {
        self.state.lock().flush_marks.clone()
    }

    pub fn clear(&self) {
        self.state.lock().buffer.clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn log(&self, record: &LogRecord<'_>) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let line = state.format.render(record);
        state.buffer.push_str(line);
        state.records += 1;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        let written = state.records;
        state.flush_marks.push(written);
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
        "memory"
    }
}
