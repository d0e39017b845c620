//! Pattern-based text formatter
//!
//! The pattern is compiled once into a list of flag renderers; formatting a
//! record then walks that list. Supported flags:
//!
//! | flag | output |
//! |------|--------|
//! | `%Y` `%m` `%d` | year, month, day |
//! | `%H` `%M` `%S` | hour, minute, second |
//! | `%e` | milliseconds |
//! | `%t` | thread id |
//! | `%l` / `%L` | short / long level name |
//! | `%n` | logger name |
//! | `%v` | message payload |
//! | `%F` `%f` `%P` | source file, function, line |
//! | `%%` | a literal `%` |
//!
//! Unknown flags are copied to the output unchanged.

use super::formatter::Formatter;
use super::log_record::LogRecord;
use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use std::fmt::Write;

pub const DEFAULT_PATTERN: &str = "[%Y-%m-%d %H:%M:%S] [%t] [%l] [%n] %v";

#[derive(Debug, Clone, PartialEq, Eq)]
enum FlagFormatter {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    ThreadId,
    LevelShort,
    LevelLong,
    LoggerName,
    Payload,
    SourceFile,
    SourceFunction,
    SourceLine,
}

/// Broken-down calendar fields for one second
#[derive(Debug, Clone, Copy, Default)]
struct CachedTime {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    flags: Vec<FlagFormatter>,
    use_utc: bool,
    cached_secs: Option<i64>,
    cached_time: CachedTime,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let flags = compile_pattern(&pattern);
        Self {
            pattern,
            flags,
            use_utc: false,
            cached_secs: None,
            cached_time: CachedTime::default(),
        }
    }

    /// Render calendar fields in UTC instead of local time
    #[must_use]
    pub fn with_utc(mut self, use_utc: bool) -> Self {
        self.use_utc = use_utc;
        self.cached_secs = None;
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.flags = compile_pattern(&self.pattern);
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn calendar(&mut self, timestamp: &DateTime<Utc>) -> CachedTime {
        let secs = timestamp.timestamp();
        if self.cached_secs != Some(secs) {
            self.cached_time = if self.use_utc {
                breakdown(timestamp)
            } else {
                breakdown(&timestamp.with_timezone(&Local))
            };
            self.cached_secs = Some(secs);
        }
        self.cached_time
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

fn breakdown<Tz: chrono::TimeZone>(dt: &DateTime<Tz>) -> CachedTime {
    CachedTime {
        year: dt.year(),
        month: dt.month(),
        day: dt.day(),
        hour: dt.hour(),
        minute: dt.minute(),
        second: dt.second(),
    }
}

fn compile_pattern(pattern: &str) -> Vec<FlagFormatter> {
    let mut flags = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let flag = match chars.next() {
            Some('Y') => FlagFormatter::Year,
            Some('m') => FlagFormatter::Month,
            Some('d') => FlagFormatter::Day,
            Some('H') => FlagFormatter::Hour,
            Some('M') => FlagFormatter::Minute,
            Some('S') => FlagFormatter::Second,
            Some('e') => FlagFormatter::Millis,
            Some('t') => FlagFormatter::ThreadId,
            Some('l') => FlagFormatter::LevelShort,
            Some('L') => FlagFormatter::LevelLong,
            Some('n') => FlagFormatter::LoggerName,
            Some('v') => FlagFormatter::Payload,
            Some('F') => FlagFormatter::SourceFile,
            Some('f') => FlagFormatter::SourceFunction,
            Some('P') => FlagFormatter::SourceLine,
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                literal.push('%');
                literal.push(other);
                continue;
            }
            None => {
                literal.push('%');
                continue;
            }
        };

        if !literal.is_empty() {
            flags.push(FlagFormatter::Literal(std::mem::take(&mut literal)));
        }
        flags.push(flag);
    }

    if !literal.is_empty() {
        flags.push(FlagFormatter::Literal(literal));
    }
    flags
}

impl Formatter for PatternFormatter {
    fn format(&mut self, record: &LogRecord<'_>, dest: &mut String) {
        dest.reserve(self.pattern.len() + record.payload.len() + 32);
        let time = self.calendar(&record.timestamp);

        // Writing into a String cannot fail
        for flag in &self.flags {
            let _ = match flag {
                FlagFormatter::Literal(s) => {
                    dest.push_str(s);
                    Ok(())
                }
                FlagFormatter::Year => write!(dest, "{:04}", time.year),
                FlagFormatter::Month => write!(dest, "{:02}", time.month),
                FlagFormatter::Day => write!(dest, "{:02}", time.day),
                FlagFormatter::Hour => write!(dest, "{:02}", time.hour),
                FlagFormatter::Minute => write!(dest, "{:02}", time.minute),
                FlagFormatter::Second => write!(dest, "{:02}", time.second),
                FlagFormatter::Millis => {
                    write!(dest, "{:03}", record.timestamp.timestamp_subsec_millis() % 1000)
                }
                FlagFormatter::ThreadId => write!(dest, "{}", record.thread_id),
                FlagFormatter::LevelShort => {
                    dest.push_str(record.level.short_name());
                    Ok(())
                }
                FlagFormatter::LevelLong => {
                    dest.push_str(record.level.long_name());
                    Ok(())
                }
                FlagFormatter::LoggerName => {
                    dest.push_str(record.logger_name);
                    Ok(())
                }
                FlagFormatter::Payload => {
                    dest.push_str(record.payload);
                    Ok(())
                }
                FlagFormatter::SourceFile => {
                    if let Some(src) = record.source {
                        dest.push_str(src.file);
                    }
                    Ok(())
                }
                FlagFormatter::SourceFunction => {
                    if let Some(src) = record.source {
                        dest.push_str(src.function);
                    }
                    Ok(())
                }
                FlagFormatter::SourceLine => match record.source {
                    Some(src) => write!(dest, "{}", src.line),
                    None => Ok(()),
                },
            };
        }

        dest.push('\n');
    }

    fn clone_box(&self) -> Box<dyn Formatter> {
        Box::new(PatternFormatter::new(self.pattern.clone()).with_utc(self.use_utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::log_record::SourceLoc;
    use chrono::TimeZone;

    fn fixed_record<'a>(payload: &'a str) -> LogRecord<'a> {
        let mut record = LogRecord::new("app", LogLevel::Warn, payload);
        record.timestamp = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123);
        record.thread_id = 7;
        record
    }

    #[test]
    fn test_default_pattern_utc() {
        let mut f = PatternFormatter::default().with_utc(true);
        let out = f.render(&fixed_record("disk almost full"));
        assert_eq!(out, "[2025-01-08 10:30:45] [7] [W] [app] disk almost full\n");
    }

    #[test]
    fn test_all_flags() {
        let mut f = PatternFormatter::new("%Y|%m|%d|%H|%M|%S|%e|%L|%n|%F:%f:%P|%v").with_utc(true);
        let record = fixed_record("x").with_source(SourceLoc::new("main.rs", 12, "app::run"));
        assert_eq!(
            f.render(&record),
            "2025|01|08|10|30|45|123|warning|app|main.rs:app::run:12|x\n"
        );
    }

    #[test]
    fn test_percent_escape_and_unknown_flag() {
        let mut f = PatternFormatter::new("100%% %q %v %");
        let out = f.render(&fixed_record("done"));
        assert_eq!(out, "100% %q done %\n");
    }

    #[test]
    fn test_missing_source_renders_empty() {
        let mut f = PatternFormatter::new("[%F:%P] %v");
        assert_eq!(f.render(&fixed_record("m")), "[:] m\n");
    }

    #[test]
    fn test_local_time_matches_chrono() {
        let record = fixed_record("local");
        let expected = record
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        let mut f = PatternFormatter::new("%Y-%m-%d %H:%M:%S");
        assert_eq!(f.render(&record), format!("{}\n", expected));
    }

    #[test]
    fn test_set_pattern_recompiles() {
        let mut f = PatternFormatter::new("%v");
        f.set_pattern("<%l> %v");
        assert_eq!(f.pattern(), "<%l> %v");
        assert_eq!(f.render(&fixed_record("y")), "<W> y\n");
    }

    #[test]
    fn test_compile_merges_literals() {
        let flags = compile_pattern("a%%b%v");
        assert_eq!(
            flags,
            vec![FlagFormatter::Literal("a%b".to_string()), FlagFormatter::Payload]
        );
    }
}
