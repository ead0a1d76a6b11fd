// DataLoader - core/output.rs
//
// Output strategies: the swappable sink the Logger renders through.
// Also hosts `AppendLog`, the open-append-close file writer shared by the
// file strategy and the severity persisters.

use crate::core::model::LogMessage;
use crate::util::error::SinkError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// A destination for rendered log messages.
///
/// A render either completes or returns an error; it is never partially
/// applied from the Logger's point of view.
pub trait OutputStrategy: Send + Sync + std::fmt::Debug {
    fn render(&self, message: &LogMessage) -> Result<(), SinkError>;
}

// =============================================================================
// Append-only log file
// =============================================================================

/// A log file opened in append mode for every write and closed afterwards.
///
/// Writers holding the same `Arc<AppendLog>` are serialised by its mutex,
/// so persisters sharing a path never interleave partial lines.
#[derive(Debug)]
pub struct AppendLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn shared(path: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` plus a newline.
    pub fn append_line(&self, line: &str) -> Result<(), SinkError> {
        // A poisoned lock only means another writer panicked mid-call;
        // the file itself is still usable.
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        // Single write call keeps the line contiguous under O_APPEND.
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        file.write_all(buf.as_bytes()).map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

// =============================================================================
// Strategies
// =============================================================================

/// Writes `[LEVEL] text` to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleOutput;

impl OutputStrategy for ConsoleOutput {
    fn render(&self, message: &LogMessage) -> Result<(), SinkError> {
        // Console output is best-effort: a closed stdout must not abort the
        // operation being logged.
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", message.render()) {
            tracing::debug!(error = %e, "Console output write failed");
        }
        Ok(())
    }
}

/// Appends `[LEVEL] text\n` to a file, opening and closing it per message.
#[derive(Debug, Clone)]
pub struct FileOutput {
    log: Arc<AppendLog>,
}

impl FileOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            log: AppendLog::shared(path),
        }
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }
}

impl OutputStrategy for FileOutput {
    fn render(&self, message: &LogMessage) -> Result<(), SinkError> {
        self.log.append_line(&message.render())
    }
}

// =============================================================================
// Configuration surface
// =============================================================================

/// Output selection as exposed to the hosting CLI/config layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputKind {
    Console,
    File(PathBuf),
}

/// Build the strategy for an `OutputKind`.
pub fn build_output(kind: &OutputKind) -> Arc<dyn OutputStrategy> {
    match kind {
        OutputKind::Console => Arc::new(ConsoleOutput),
        OutputKind::File(path) => Arc::new(FileOutput::new(path.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::severity::Severity;

    #[test]
    fn test_file_output_appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let out = FileOutput::new(&path);

        out.render(&LogMessage::new("first", Severity::Info)).unwrap();
        out.render(&LogMessage::new("second", Severity::Error))
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[INFO] first\n[ERROR] second\n");
    }

    #[test]
    fn test_file_output_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let out = FileOutput::new(dir.path().join("missing").join("log.txt"));
        let err = out
            .render(&LogMessage::new("x", Severity::Info))
            .unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn test_console_output_never_fails() {
        assert!(ConsoleOutput
            .render(&LogMessage::new("hello", Severity::Update))
            .is_ok());
    }

    #[test]
    fn test_build_output_file_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let out = build_output(&OutputKind::File(path.clone()));
        out.render(&LogMessage::new("via kind", Severity::Warning))
            .unwrap();
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("[WARNING] via kind"));
    }
}
