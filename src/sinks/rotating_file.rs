//! Size-based rotating file sink
//!
//! When the next line would push the active file past `max_size`, files are
//! shifted: `app.log.(N-1)` → `app.log.N`, …, `app.log` → `app.log.1`, and a
//! fresh `app.log` is opened. At most `max_files` backups are kept; the oldest
//! is deleted. Backups can optionally be gzip-compressed (`app.log.1.gz`).

use super::file::open_log_file;
use crate::core::sink::{FormatState, SinkLevel};
use crate::core::{Formatter, LogLevel, LogRecord, LoggerError, PatternFormatter, Result, Sink};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

struct RotatingState {
    format: FormatState,
    writer: Option<BufWriter<File>>,
    current_size: u64,
}

pub struct RotatingFileSink {
    base_path: PathBuf,
    max_size: u64,
    max_files: usize,
    compress: bool,
    level: SinkLevel,
    state: Mutex<RotatingState>,
}

impl RotatingFileSink {
    /// Create a rotating sink writing to `base_path`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `max_size` or `max_files` is zero, or an
    /// I/O error if the file cannot be opened.
    pub fn new(base_path: impl Into<PathBuf>, max_size: u64, max_files: usize) -> Result<Self> {
        if max_size == 0 {
            return Err(LoggerError::config(
                "RotatingFileSink",
                "max_size must be greater than 0",
            ));
        }
        if max_files == 0 {
            return Err(LoggerError::config(
                "RotatingFileSink",
                "max_files must be greater than 0",
            ));
        }

        let base_path = base_path.into();
        let file = open_log_file(&base_path, false)?;
        let current_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_sink(
                    base_path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok(Self {
            base_path,
            max_size,
            max_files,
            compress: false,
            level: SinkLevel::new(LogLevel::Trace),
            state: Mutex::new(RotatingState {
                format: FormatState::new(Box::new(PatternFormatter::default())),
                writer: Some(BufWriter::new(file)),
                current_size,
            }),
        })
    }

    /// Gzip rotated backups
    #[must_use]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Path of the `index`-th file; index 0 is the active file
    pub fn calc_filename(base_path: &Path, index: usize) -> PathBuf {
        if index == 0 {
            return base_path.to_path_buf();
        }
        let mut path = base_path.to_path_buf();
        let filename = base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("app.log");
        path.set_file_name(format!("{}.{}", filename, index));
        path
    }

    pub fn filename(&self) -> &Path {
        &self.base_path
    }

    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    fn rotate(&self, state: &mut RotatingState) -> Result<()> {
        // Close the active file before renaming it
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let oldest = Self::calc_filename(&self.base_path, self.max_files);
        remove_if_exists(&oldest)?;
        remove_if_exists(&gz_path(&oldest))?;

        for i in (1..self.max_files).rev() {
            let src = Self::calc_filename(&self.base_path, i);
            let dst = Self::calc_filename(&self.base_path, i + 1);
            rename_if_exists(&src, &dst)?;
            rename_if_exists(&gz_path(&src), &gz_path(&dst))?;
        }

        let first_backup = Self::calc_filename(&self.base_path, 1);
        rename_if_exists(&self.base_path, &first_backup)?;
        if self.compress && first_backup.exists() {
            compress_file(&first_backup)?;
        }

        let file = open_log_file(&self.base_path, true)?;
        state.writer = Some(BufWriter::new(file));
        state.current_size = 0;
        Ok(())
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(LoggerError::file_rotation(
            path.display().to_string(),
            format!("Failed to remove old backup: {}", e),
        )),
    }
}

fn rename_if_exists(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Ok(());
    }
    // Some platforms refuse to rename over an existing file
    remove_if_exists(dst)?;
    fs::rename(src, dst).map_err(|e| {
        LoggerError::file_rotation(
            src.display().to_string(),
            format!("Failed to rename to '{}': {}", dst.display(), e),
        )
    })
}

/// Compress `path` to `path.gz`, removing the original only on success
fn compress_file(path: &Path) -> Result<()> {
    let gz = gz_path(path);
    let mut tmp = gz.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = (|| -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&tmp)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&tmp, &gz)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress '{}'", path.display()),
            e,
        ));
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
            path.display(),
            e
        );
    }
    Ok(())
}

impl Sink for RotatingFileSink {
    fn log(&self, record: &LogRecord<'_>) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let line_len = state.format.render(record).len() as u64;
        let mut rotation_error = None;
        if state.current_size > 0 && state.current_size + line_len > self.max_size {
            if let Err(e) = self.rotate(state) {
                rotation_error = Some(e);
            }
        }

        // Keep writing to whatever file is usable so the record is not lost
        if state.writer.is_none() {
            let file = open_log_file(&self.base_path, false)?;
            state.current_size = file.metadata().map(|m| m.len()).unwrap_or(0);
            state.writer = Some(BufWriter::new(file));
        }
        if let Some(writer) = state.writer.as_mut() {
            writer.write_all(state.format.line.as_bytes())?;
            state.current_size += line_len;
        }

        match rotation_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn flush(&self) -> Result<()> {
        if let Some(writer) = self.state.lock().writer.as_mut() {
            writer.flush()?;
        }
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
        "rotating_file"
    }
}

impl Drop for RotatingFileSink {
    fn drop(&mut self) {
        if let Some(writer) = self.state.get_mut().writer.as_mut() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(payload: &str) -> LogRecord<'_> {
        LogRecord::new("rot", LogLevel::Info, payload)
    }

    #[test]
    fn test_invalid_rotation_config() {
        let dir = TempDir::new().unwrap();
        let err = RotatingFileSink::new(dir.path().join("a.log"), 0, 3).err().unwrap();
        assert!(err.is_config());
        let err = RotatingFileSink::new(dir.path().join("a.log"), 1024, 0).err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_calc_filename() {
        let base = Path::new("/var/log/app.log");
        assert_eq!(RotatingFileSink::calc_filename(base, 0), PathBuf::from("/var/log/app.log"));
        assert_eq!(RotatingFileSink::calc_filename(base, 3), PathBuf::from("/var/log/app.log.3"));
    }

    #[test]
    fn test_rotates_and_caps_backups() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        // Each line is "msg-N\n" = 6 bytes; 12 bytes fits two lines per file
        let sink = RotatingFileSink::new(&base, 12, 2).unwrap();
        sink.set_pattern("%v");

        for i in 0..8 {
            sink.log(&record(&format!("msg-{}", i))).unwrap();
        }
        sink.flush().unwrap();

        assert_eq!(fs::read_to_string(&base).unwrap(), "msg-6\nmsg-7\n");
        assert_eq!(
            fs::read_to_string(RotatingFileSink::calc_filename(&base, 1)).unwrap(),
            "msg-4\nmsg-5\n"
        );
        assert_eq!(
            fs::read_to_string(RotatingFileSink::calc_filename(&base, 2)).unwrap(),
            "msg-2\nmsg-3\n"
        );
        assert!(!RotatingFileSink::calc_filename(&base, 3).exists());
    }

    #[test]
    fn test_initial_size_from_existing_file() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        fs::write(&base, "0123456789").unwrap();

        let sink = RotatingFileSink::new(&base, 12, 1).unwrap();
        assert_eq!(sink.current_size(), 10);
        sink.set_pattern("%v");
        sink.log(&record("abc")).unwrap();

        assert_eq!(
            fs::read_to_string(RotatingFileSink::calc_filename(&base, 1)).unwrap(),
            "0123456789"
        );
        assert_eq!(sink.current_size(), 4);
    }

    #[test]
    fn test_compressed_backups() {
        use std::io::Read;

        let dir = TempDir::new().unwrap();
        let base = dir.path().join("app.log");
        let sink = RotatingFileSink::new(&base, 6, 2).unwrap().with_compression(true);
        sink.set_pattern("%v");

        sink.log(&record("first")).unwrap();
        sink.log(&record("later")).unwrap();
        sink.flush().unwrap();

        let backup = gz_path(&RotatingFileSink::calc_filename(&base, 1));
        assert!(backup.exists());
        assert!(!RotatingFileSink::calc_filename(&base, 1).exists());

        let mut decoded = String::new();
        flate2::read::GzDecoder::new(File::open(&backup).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "first\n");
        assert_eq!(fs::read_to_string(&base).unwrap(), "later\n");
    }
}
