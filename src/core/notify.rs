// DataLoader - core/notify.rs
//
// The independent notification channel. A `Subject` fans status messages
// out to its observers with no severity filter and no dependency on the
// Logger's configuration. It runs alongside the Logger's own subscriber
// list and is never merged into it.

use crate::core::model::format_line;
use crate::core::severity::Severity;
use std::sync::{Arc, Mutex, MutexGuard};

/// Observer attached to a `Subject`.
pub trait Observer: Send + Sync + std::fmt::Debug {
    fn update(&self, message: &str, level: Severity);
}

/// Capability to broadcast a status message unconditionally.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: Severity, message: &str);
}

/// Unfiltered, synchronous fan-out list.
#[derive(Debug, Default)]
pub struct Subject {
    observers: Mutex<Vec<Arc<dyn Observer>>>,
}

fn data_ptr<O: ?Sized>(o: &Arc<O>) -> *const () {
    Arc::as_ptr(o) as *const ()
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn Observer>>> {
        self.observers.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn attach(&self, observer: Arc<dyn Observer>) {
        self.lock().push(observer);
    }

    /// Detach by identity. Unknown observers are ignored.
    pub fn detach<O: Observer + ?Sized>(&self, observer: &Arc<O>) {
        let target = data_ptr(observer);
        let mut observers = self.lock();
        if let Some(pos) = observers.iter().position(|o| data_ptr(o) == target) {
            observers.remove(pos);
        }
    }

    pub fn observer_count(&self) -> usize {
        self.lock().len()
    }
}

impl Notifier for Subject {
    fn notify(&self, level: Severity, message: &str) {
        let observers = self.lock().clone();
        tracing::trace!(
            level = level.name(),
            observers = observers.len(),
            "Subject notify"
        );
        for observer in &observers {
            observer.update(message, level);
        }
    }
}

/// Prints every notification to stdout as `[LEVEL] message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn update(&self, message: &str, level: Severity) {
        println!("{}", format_line(message, level));
    }
}
