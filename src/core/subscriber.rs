// DataLoader - core/subscriber.rs
//
// Logger subscribers. Each subscriber decides for itself which severities
// it cares about; the Logger forwards every passing message to all of them.

use crate::core::model::format_line;
use crate::core::output::AppendLog;
use crate::core::severity::Severity;
use crate::util::error::SinkError;
use std::sync::{Arc, Mutex};

/// Observer registered on the Logger.
pub trait Subscriber: Send + Sync + std::fmt::Debug {
    fn receive(&self, text: &str, severity: Severity) -> Result<(), SinkError>;
}

// =============================================================================
// Severity persisters
// =============================================================================

/// Appends messages of exactly one severity to a log file.
///
/// The error-only and warning-only persisters usually share one
/// `AppendLog`, which serialises their writes.
#[derive(Debug, Clone)]
pub struct SeverityPersister {
    accepts: Severity,
    log: Arc<AppendLog>,
}

impl SeverityPersister {
    pub fn new(accepts: Severity, log: Arc<AppendLog>) -> Self {
        Self { accepts, log }
    }

    /// Persists ERROR messages only.
    pub fn error_only(log: Arc<AppendLog>) -> Self {
        Self::new(Severity::Error, log)
    }

    /// Persists WARNING messages only.
    pub fn warning_only(log: Arc<AppendLog>) -> Self {
        Self::new(Severity::Warning, log)
    }

    pub fn accepts(&self) -> Severity {
        self.accepts
    }
}

impl Subscriber for SeverityPersister {
    fn receive(&self, text: &str, severity: Severity) -> Result<(), SinkError> {
        if severity != self.accepts {
            return Ok(());
        }
        self.log.append_line(&format_line(text, severity))
    }
}

// =============================================================================
// UI buffer
// =============================================================================

/// Accumulates INFO, UPDATE and WARNING messages for display.
#[derive(Debug, Default)]
pub struct UiBuffer {
    logs: Mutex<Vec<(String, Severity)>>,
}

impl UiBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn accepts(severity: Severity) -> bool {
        matches!(
            severity,
            Severity::Info | Severity::Update | Severity::Warning
        )
    }

    /// Snapshot of everything received so far, oldest first.
    pub fn get_logs(&self) -> Vec<(String, Severity)> {
        self.logs.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.logs.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.logs.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

impl Subscriber for UiBuffer {
    fn receive(&self, text: &str, severity: Severity) -> Result<(), SinkError> {
        if Self::accepts(severity) {
            self.logs
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .push((text.to_string(), severity));
        }
        Ok(())
    }
}
