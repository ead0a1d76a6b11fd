// DataLoader - core/report.rs
//
// Dual-channel reporting used by loaders, the factory and table edits:
// every event goes to the Logger (filtered) and to the Notifier
// (unfiltered), in that order. `log` reaches the Logger alone.

use crate::core::logger::{Dispatch, Logger};
use crate::core::notify::Notifier;
use crate::core::severity::Severity;
use std::sync::Arc;

/// Shared handles to both reporting channels.
#[derive(Clone)]
pub struct Reporter {
    logger: Arc<Logger>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("logger", &self.logger)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    pub fn new(logger: Arc<Logger>, notifier: Arc<dyn Notifier>) -> Self {
        Self { logger, notifier }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Send `text` at `level` on both channels.
    ///
    /// A Logger sink failure is recorded as a diagnostic and does not stop
    /// the notification or the caller's operation.
    pub fn report(&self, level: Severity, text: &str) -> Option<Dispatch> {
        let dispatch = self.log(level, text);
        self.notifier.notify(level, text);
        dispatch
    }

    /// Send `text` to the Logger only, absorbing sink failures like
    /// [`Reporter::report`].
    pub fn log(&self, level: Severity, text: &str) -> Option<Dispatch> {
        match self.logger.emit(text, level) {
            Ok(d) => Some(d),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    level = level.name(),
                    "Log sink failed; continuing"
                );
                None
            }
        }
    }

    pub fn info(&self, text: &str) -> Option<Dispatch> {
        self.report(Severity::Info, text)
    }

    pub fn update(&self, text: &str) -> Option<Dispatch> {
        self.report(Severity::Update, text)
    }

    pub fn warning(&self, text: &str) -> Option<Dispatch> {
        self.report(Severity::Warning, text)
    }

    pub fn error(&self, text: &str) -> Option<Dispatch> {
        self.report(Severity::Error, text)
    }
}
