//! Console sink implementation

use crate::core::sink::{FormatState, SinkLevel};
use crate::core::{Formatter, LogLevel, LogRecord, PatternFormatter, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

pub struct ConsoleSink {
    target: ConsoleTarget,
    use_colors: bool,
    level: SinkLevel,
    state: Mutex<FormatState>,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self {
            target,
            use_colors: false,
            level: SinkLevel::new(LogLevel::Trace),
            state: Mutex::new(FormatState::new(Box::new(PatternFormatter::default()))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleTarget::Stderr)
    }

    /// Colored stdout sink, one color per level
    pub fn stdout_color() -> Self {
        Self::stdout().with_colors(true)
    }

    pub fn stderr_color() -> Self {
        Self::stderr().with_colors(true)
    }

    /// Enable or disable per-level coloring
    ///
    /// Has no effect when the crate is built without the `console` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    fn write_line(&self, line: &str) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(line.as_bytes())?,
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(line.as_bytes())?,
        }
        Ok(())
    }

    #[cfg(feature = "console")]
    fn colorize(&self, line: &str, level: LogLevel) -> Option<String> {
        if !self.use_colors {
            return None;
        }
        let body = line.strip_suffix('\n').unwrap_or(line);
        Some(format!("{}\n", body.color(level.color_code())))
    }

    #[cfg(not(feature = "console"))]
    fn colorize(&self, _line: &str, _level: LogLevel) -> Option<String> {
        None
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn log(&self, record: &LogRecord<'_>) -> Result<()> {
        // Hold the sink lock across the write so concurrent lines never interleave
        let mut state = self.state.lock();
        let line = state.render(record);
        match self.colorize(line, record.level) {
            Some(colored_line) => self.write_line(&colored_line),
            None => self.write_line(line),
        }
    }

    fn flush(&self) -> Result<()> {
        let _state = self.state.lock();
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn set_formatter(&self, formatter: Box<dyn Formatter>) {
        self.state.lock().formatter = formatter;
    }

    fn level(&self) -> LogLevel {
        self.level.get()
    }

    fn set_level(&self, level: LogLevel) {
        self.level.set(level);
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => "stdout",
            ConsoleTarget::Stderr => "stderr",
        }
    }
}
