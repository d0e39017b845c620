//! Formatter trait for rendering records into text

use super::log_record::LogRecord;

/// Renders a [`LogRecord`] into its textual form
///
/// Formatters are owned by sinks and only ever called under the sink's lock,
/// so `format` takes `&mut self` and may keep caches.
pub trait Formatter: Send {
    /// Append the rendered record (including the trailing newline) to `dest`
    fn format(&mut self, record: &LogRecord<'_>, dest: &mut String);

    fn clone_box(&self) -> Box<dyn Formatter>;

    fn render(&mut self, record: &LogRecord<'_>) -> String {
        let mut out = String::with_capacity(128);
        self.format(record, &mut out);
        out
    }
}

impl Clone for Box<dyn Formatter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
