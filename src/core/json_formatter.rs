//! JSON formatter: one object per line for machine processing
//!
//! Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","logger":"app","thread_id":3,"message":"Request processed"}`

use super::formatter::Formatter;
use super::log_record::LogRecord;
use chrono::SecondsFormat;

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    include_source: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `file`, `line` and `function` keys when the record carries a source location
    #[must_use]
    pub fn with_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&mut self, record: &LogRecord<'_>, dest: &mut String) {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(record.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(record.level.to_str().to_string()),
        );
        json_obj.insert(
            "logger".to_string(),
            serde_json::Value::String(record.logger_name.to_string()),
        );
        json_obj.insert(
            "thread_id".to_string(),
            serde_json::Value::Number(record.thread_id.into()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(record.payload.to_string()),
        );

        if self.include_source {
            if let Some(src) = record.source {
                json_obj.insert("file".to_string(), serde_json::Value::String(src.file.to_string()));
                json_obj.insert("line".to_string(), serde_json::Value::Number(src.line.into()));
                json_obj.insert(
                    "function".to_string(),
                    serde_json::Value::String(src.function.to_string()),
                );
            }
        }

        dest.push_str(&serde_json::Value::Object(json_obj).to_string());
        dest.push('\n');
    }

    fn clone_box(&self) -> Box<dyn Formatter> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::log_level::LogLevel;
    use crate::core::log_record::SourceLoc;

    #[test]
    fn test_json_format() {
        let record = LogRecord::new("api", LogLevel::Error, "Error \"quoted\" occurred");
        let out = JsonFormatter::new().render(&record);
        assert!(out.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed["level"], "ERROR");
        assert_eq!(parsed["logger"], "api");
        assert_eq!(parsed["message"], "Error \"quoted\" occurred");
        assert!(parsed["timestamp"].is_string());
        assert!(parsed.get("file").is_none());
    }

    #[test]
    fn test_json_format_with_source() {
        let record = LogRecord::new("api", LogLevel::Info, "hi")
            .with_source(SourceLoc::new("src/api.rs", 42, "api::handler"));
        let out = JsonFormatter::new().with_source(true).render(&record);

        let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(parsed["file"], "src/api.rs");
        assert_eq!(parsed["line"], 42);
        assert_eq!(parsed["function"], "api::handler");
    }
}
