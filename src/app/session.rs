// DataLoader - app/session.rs
//
// Composition root. Wires one Logger (with its error persister, warning
// persister and UI buffer), one notification Subject and the loader
// factory, then drives start-up and file loading.

use crate::core::factory::LoaderFactory;
use crate::core::logger::Logger;
use crate::core::model::{LoadInput, LoadedData};
use crate::core::notify::{Notifier, Observer, Subject};
use crate::core::output::{build_output, AppendLog, OutputKind};
use crate::core::report::Reporter;
use crate::core::severity::{Severity, Threshold};
use crate::core::subscriber::{SeverityPersister, UiBuffer};
use crate::util::constants;
use crate::util::error::SessionError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output selection at start-up. `None` refuses to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputChoice {
    None,
    Console,
    File(PathBuf),
}

impl OutputChoice {
    fn into_kind(self) -> Option<OutputKind> {
        match self {
            OutputChoice::None => None,
            OutputChoice::Console => Some(OutputKind::Console),
            OutputChoice::File(path) => Some(OutputKind::File(path)),
        }
    }
}

/// A wired pipeline plus its start-up state.
#[derive(Debug)]
pub struct Session {
    logger: Arc<Logger>,
    subject: Arc<Subject>,
    ui: Arc<UiBuffer>,
    reporter: Reporter,
    factory: LoaderFactory,
    started: bool,
}

impl Session {
    /// Wire a session around `logger`.
    ///
    /// The error-only and warning-only persisters share one `AppendLog`
    /// at `shared_log_file`.
    pub fn new(logger: Arc<Logger>, shared_log_file: &Path) -> Self {
        let shared = AppendLog::shared(shared_log_file);
        let ui = Arc::new(UiBuffer::new());

        logger.add_subscriber(Arc::new(SeverityPersister::error_only(Arc::clone(&shared))));
        logger.add_subscriber(Arc::new(SeverityPersister::warning_only(shared)));
        logger.add_subscriber(ui.clone());

        let subject = Arc::new(Subject::new());
        let reporter = Reporter::new(Arc::clone(&logger), subject.clone());
        let factory = LoaderFactory::new(reporter.clone());

        tracing::debug!(
            shared_log = %shared_log_file.display(),
            subscribers = logger.subscriber_count(),
            "Session wired"
        );

        Self {
            logger,
            subject,
            ui,
            reporter,
            factory,
            started: false,
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn subject(&self) -> &Arc<Subject> {
        &self.subject
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn factory(&self) -> &LoaderFactory {
        &self.factory
    }

    /// Attach an observer to the notification channel.
    pub fn attach_observer(&self, observer: Arc<dyn Observer>) {
        self.subject.attach(observer);
    }

    /// Snapshot of the UI buffer.
    pub fn ui_logs(&self) -> Vec<(String, Severity)> {
        self.ui.get_logs()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Configure output and threshold, then announce the start.
    pub fn start(&mut self, output: OutputChoice, threshold: Threshold) -> Result<(), SessionError> {
        let Some(kind) = output.into_kind() else {
            tracing::warn!("Start refused: no output method selected");
            return Err(SessionError::NoOutput);
        };

        self.logger.set_output_strategy(build_output(&kind));
        self.logger.set_threshold(threshold);
        self.started = true;

        tracing::info!(output = ?kind, rank = threshold.rank(), "Session started");
        self.reporter.info(constants::MSG_PROGRAM_STARTED);
        Ok(())
    }

    /// Read `path` and load it with the loader for its extension.
    ///
    /// `Ok(None)` means the tag was unsupported or the parse failed; both
    /// were already reported on the pipeline.
    pub fn load_path(&self, path: &Path) -> Result<Option<LoadedData>, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }

        let input = match LoadInput::from_path(path) {
            Ok(input) => input,
            Err(source) => {
                self.reporter
                    .error(&format!("Error processing file: {source}"));
                return Err(SessionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        self.load_input(&input)
    }

    /// Load an in-memory input using the tag derived from its name.
    pub fn load_input(&self, input: &LoadInput) -> Result<Option<LoadedData>, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }

        let tag = input.extension().unwrap_or_else(|| input.name.clone());
        let Some(loader) = self.factory.create_loader(&tag) else {
            return Ok(None);
        };
        Ok(loader.load(input))
    }

    /// Broadcast on the notification channel only.
    pub fn notify(&self, level: Severity, message: &str) {
        self.subject.notify(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(dir: &Path) -> Session {
        Session::new(Arc::new(Logger::new()), &dir.join("ew.txt"))
    }

    #[test]
    fn test_new_attaches_three_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(dir.path());
        assert_eq!(s.logger().subscriber_count(), 3);
        assert_eq!(s.subject().observer_count(), 0);
        assert!(!s.is_started());
    }

    #[test]
    fn test_start_without_output_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        let err = s.start(OutputChoice::None, Threshold::All).unwrap_err();
        assert!(matches!(err, SessionError::NoOutput));
        assert!(!s.logger().has_output());
        assert!(s.ui_logs().is_empty());
    }

    #[test]
    fn test_start_announces_program_started() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log.txt");
        let mut s = session(dir.path());
        s.start(OutputChoice::File(log.clone()), Threshold::All)
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "[INFO] Program started\n"
        );
        assert_eq!(
            s.ui_logs(),
            vec![("Program started".to_string(), Severity::Info)]
        );
    }

    #[test]
    fn test_load_before_start_refused() {
        let dir = tempfile::tempdir().unwrap();
        let s = session(dir.path());
        let input = LoadInput::new("a.csv", "x\n1\n");
        assert!(matches!(
            s.load_input(&input),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn test_load_input_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        s.start(OutputChoice::File(dir.path().join("log.txt")), Threshold::All)
            .unwrap();

        let data = s
            .load_input(&LoadInput::new("DATA.JSON", r#"[{"a":1}]"#))
            .unwrap()
            .unwrap();
        assert_eq!(data.as_table().unwrap().columns, vec!["a"]);

        assert!(s
            .load_input(&LoadInput::new("archive.zip", "PK"))
            .unwrap()
            .is_none());
        let shared = std::fs::read_to_string(dir.path().join("ew.txt")).unwrap();
        assert_eq!(shared, "[ERROR] Unsupported file type: zip\n");
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = session(dir.path());
        s.start(OutputChoice::File(dir.path().join("log.txt")), Threshold::All)
            .unwrap();

        let err = s.load_path(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
        let shared = std::fs::read_to_string(dir.path().join("ew.txt")).unwrap();
        assert!(shared.starts_with("[ERROR] Error processing file: "));
    }
}
