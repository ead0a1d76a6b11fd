// DataLoader - core/logger.rs
//
// The severity-filtered Logger: one active output strategy, one threshold,
// an ordered list of subscribers.
//
// Dispatch order for a passing message:
//   1. render through the output strategy
//   2. `receive` on each subscriber, in attachment order
// A failing step stops the rest of that dispatch and its error is returned
// to the caller of `emit`.

use crate::core::model::LogMessage;
use crate::core::output::OutputStrategy;
use crate::core::severity::{passes, Severity, Threshold};
use crate::core::subscriber::Subscriber;
use crate::util::error::SinkError;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// What `emit` did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// No output strategy is set; the message was dropped.
    NoOutput,

    /// The message was below the threshold.
    Filtered,

    /// Rendered and forwarded to this many subscribers.
    Delivered { subscribers: usize },
}

#[derive(Debug, Default)]
struct LoggerState {
    output: Option<Arc<dyn OutputStrategy>>,
    threshold: Threshold,
    subscribers: Vec<Arc<dyn Subscriber>>,
}

/// Severity-filtered logger with a pluggable output strategy.
///
/// Collaborators normally receive an `Arc<Logger>` from the composition
/// root. [`Logger::global`] exists for code that needs the process-wide
/// instance.
#[derive(Debug, Default)]
pub struct Logger {
    state: Mutex<LoggerState>,
}

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

/// Address of the subscriber allocation, ignoring vtable metadata.
fn data_ptr<S: ?Sized>(s: &Arc<S>) -> *const () {
    Arc::as_ptr(s) as *const ()
}

impl Logger {
    /// A fresh, unconfigured logger: no output, threshold INFO.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide logger, created on first access.
    pub fn global() -> Arc<Logger> {
        Arc::clone(GLOBAL.get_or_init(|| {
            tracing::debug!("Creating process-wide logger");
            Arc::new(Logger::new())
        }))
    }

    fn lock(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the active output strategy.
    pub fn set_output_strategy(&self, output: Arc<dyn OutputStrategy>) {
        tracing::debug!(output = ?output, "Output strategy set");
        self.lock().output = Some(output);
    }

    /// Remove the output strategy. Subsequent emits are dropped.
    pub fn clear_output_strategy(&self) {
        self.lock().output = None;
    }

    pub fn has_output(&self) -> bool {
        self.lock().output.is_some()
    }

    pub fn set_threshold(&self, threshold: impl Into<Threshold>) {
        let threshold = threshold.into();
        tracing::debug!(rank = threshold.rank(), "Threshold set");
        self.lock().threshold = threshold;
    }

    pub fn threshold(&self) -> Threshold {
        self.lock().threshold
    }

    /// Attach a subscriber at the end of the notification order.
    pub fn add_subscriber(&self, subscriber: Arc<dyn Subscriber>) {
        self.lock().subscribers.push(subscriber);
    }

    /// Detach a subscriber by identity. Unknown subscribers are ignored.
    pub fn remove_subscriber<S: Subscriber + ?Sized>(&self, subscriber: &Arc<S>) {
        let target = data_ptr(subscriber);
        let mut state = self.lock();
        if let Some(pos) = state
            .subscribers
            .iter()
            .position(|s| data_ptr(s) == target)
        {
            state.subscribers.remove(pos);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    // -------------------------------------------------------------------------
    // Emission
    // -------------------------------------------------------------------------

    /// Filter, render, and fan out one message.
    pub fn emit(&self, text: &str, level: Severity) -> Result<Dispatch, SinkError> {
        // Snapshot under the lock, dispatch outside it so subscribers may
        // call back into the logger.
        let (output, subscribers) = {
            let state = self.lock();
            let Some(output) = state.output.clone() else {
                return Ok(Dispatch::NoOutput);
            };
            if !passes(level, state.threshold) {
                return Ok(Dispatch::Filtered);
            }
            (output, state.subscribers.clone())
        };

        let message = LogMessage::new(text, level);
        output.render(&message)?;
        for subscriber in &subscribers {
            subscriber.receive(&message.text, message.severity)?;
        }

        Ok(Dispatch::Delivered {
            subscribers: subscribers.len(),
        })
    }

    pub fn info(&self, text: &str) -> Result<Dispatch, SinkError> {
        self.emit(text, Severity::Info)
    }

    pub fn update(&self, text: &str) -> Result<Dispatch, SinkError> {
        self.emit(text, Severity::Update)
    }

    pub fn warning(&self, text: &str) -> Result<Dispatch, SinkError> {
        self.emit(text, Severity::Warning)
    }

    pub fn error(&self, text: &str) -> Result<Dispatch, SinkError> {
        self.emit(text, Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::FileOutput;
    use std::path::PathBuf;

    #[derive(Debug, Default)]
    struct CountingOutput {
        rendered: Mutex<Vec<LogMessage>>,
    }

    impl OutputStrategy for CountingOutput {
        fn render(&self, message: &LogMessage) -> Result<(), SinkError> {
            self.rendered.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    /// Records its id into a shared journal so call order is visible.
    #[derive(Debug)]
    struct Recorder {
        id: usize,
        journal: Arc<Mutex<Vec<(usize, String, Severity)>>>,
    }

    impl Subscriber for Recorder {
        fn receive(&self, text: &str, severity: Severity) -> Result<(), SinkError> {
            self.journal
                .lock()
                .unwrap()
                .push((self.id, text.to_string(), severity));
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Failing;

    impl Subscriber for Failing {
        fn receive(&self, _text: &str, _severity: Severity) -> Result<(), SinkError> {
            Err(SinkError::Io {
                path: PathBuf::from("failing"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "nope"),
            })
        }
    }

    fn journal() -> Arc<Mutex<Vec<(usize, String, Severity)>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_no_output_drops_message() {
        let logger = Logger::new();
        let j = journal();
        logger.add_subscriber(Arc::new(Recorder {
            id: 1,
            journal: Arc::clone(&j),
        }));

        assert_eq!(logger.info("a").unwrap(), Dispatch::NoOutput);
        assert!(j.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cleared_output_drops_again() {
        let logger = Logger::new();
        let out = Arc::new(CountingOutput::default());
        logger.set_output_strategy(out.clone());
        assert!(logger.has_output());

        logger.clear_output_strategy();
        assert!(!logger.has_output());
        assert_eq!(logger.error("gone").unwrap(), Dispatch::NoOutput);
        assert!(out.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_below_threshold_never_renders() {
        let logger = Logger::new();
        let out = Arc::new(CountingOutput::default());
        logger.set_output_strategy(out.clone());

        for threshold in Severity::all() {
            logger.set_threshold(*threshold);
            for level in Severity::all().iter().filter(|l| l.rank() < threshold.rank()) {
                assert_eq!(logger.emit("x", *level).unwrap(), Dispatch::Filtered);
            }
        }
        assert!(out.rendered.lock().unwrap().is_empty());
    }

    #[test]
    fn test_all_threshold_renders_everything() {
        let logger = Logger::new();
        let out = Arc::new(CountingOutput::default());
        logger.set_output_strategy(out.clone());
        logger.set_threshold(Threshold::All);

        for level in Severity::all() {
            logger.emit("x", *level).unwrap();
        }
        assert_eq!(out.rendered.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_subscribers_notified_once_in_order() {
        let logger = Logger::new();
        logger.set_output_strategy(Arc::new(CountingOutput::default()));
        let j = journal();
        for id in 1..=3 {
            logger.add_subscriber(Arc::new(Recorder {
                id,
                journal: Arc::clone(&j),
            }));
        }

        let d = logger.warning("careful").unwrap();
        assert_eq!(d, Dispatch::Delivered { subscribers: 3 });

        let ids: Vec<usize> = j.lock().unwrap().iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_removed_subscriber_not_invoked() {
        let logger = Logger::new();
        logger.set_output_strategy(Arc::new(CountingOutput::default()));
        let j = journal();
        let keep = Arc::new(Recorder {
            id: 1,
            journal: Arc::clone(&j),
        });
        let drop_me = Arc::new(Recorder {
            id: 2,
            journal: Arc::clone(&j),
        });
        logger.add_subscriber(keep.clone());
        logger.add_subscriber(drop_me.clone());

        logger.remove_subscriber(&drop_me);
        // Second removal is a silent no-op.
        logger.remove_subscriber(&drop_me);
        logger.error("gone").unwrap();

        let ids: Vec<usize> = j.lock().unwrap().iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(logger.subscriber_count(), 1);
    }

    #[test]
    fn test_failing_subscriber_blocks_later_ones() {
        let logger = Logger::new();
        logger.set_output_strategy(Arc::new(CountingOutput::default()));
        let j = journal();
        logger.add_subscriber(Arc::new(Failing));
        logger.add_subscriber(Arc::new(Recorder {
            id: 9,
            journal: Arc::clone(&j),
        }));

        assert!(logger.info("x").is_err());
        assert!(j.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unwritable_file_output_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::new();
        logger.set_output_strategy(Arc::new(FileOutput::new(
            dir.path().join("no_such_dir").join("log.txt"),
        )));
        let err = logger.error("x").unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
    }

    #[test]
    fn test_global_is_single_instance() {
        let a = Logger::global();
        let b = Logger::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
