// DataLoader - core/factory.rs
//
// Resolves a format tag to a loader. Unknown tags are reported on both
// channels as "Unsupported file type: <tag>" and produce no loader.

use crate::core::formats::FileFormat;
use crate::core::loader::{FormatLoader, Loader};
use crate::core::report::Reporter;
use crate::util::error::FactoryError;

/// Stateless resolver from format tags to loaders.
#[derive(Debug, Clone)]
pub struct LoaderFactory {
    reporter: Reporter,
}

impl LoaderFactory {
    pub fn new(reporter: Reporter) -> Self {
        Self { reporter }
    }

    /// Loader for a known format. Total over `FileFormat`.
    pub fn create(&self, format: FileFormat) -> Box<dyn Loader> {
        Box::new(FormatLoader::new(format, self.reporter.clone()))
    }

    /// Resolve `tag`, reporting unsupported tags.
    pub fn try_create_loader(&self, tag: &str) -> Result<Box<dyn Loader>, FactoryError> {
        match FileFormat::from_tag(tag) {
            Some(format) => {
                tracing::debug!(tag, "Loader resolved");
                Ok(self.create(format))
            }
            None => {
                let err = FactoryError::Unsupported {
                    tag: tag.to_string(),
                };
                self.reporter.error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Resolve `tag`; `None` when unsupported (already reported).
    pub fn create_loader(&self, tag: &str) -> Option<Box<dyn Loader>> {
        self.try_create_loader(tag).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::logger::Logger;
    use crate::core::notify::{Observer, Subject};
    use crate::core::severity::Severity;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Collect(Mutex<Vec<(String, Severity)>>);

    impl Observer for Collect {
        fn update(&self, message: &str, level: Severity) {
            self.0.lock().unwrap().push((message.to_string(), level));
        }
    }

    fn factory() -> (LoaderFactory, Arc<Collect>) {
        let subject = Arc::new(Subject::new());
        let seen = Arc::new(Collect::default());
        subject.attach(seen.clone());
        let reporter = Reporter::new(Arc::new(Logger::new()), subject);
        (LoaderFactory::new(reporter), seen)
    }

    #[test]
    fn test_every_known_tag_resolves() {
        let (f, seen) = factory();
        for format in FileFormat::all() {
            let loader = f.create_loader(format.tag()).unwrap();
            assert_eq!(loader.format(), *format);
        }
        assert!(seen.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_tag_reported() {
        let (f, seen) = factory();
        assert!(f.create_loader("zip").is_none());
        assert_eq!(
            *seen.0.lock().unwrap(),
            vec![("Unsupported file type: zip".to_string(), Severity::Error)]
        );
    }

    #[test]
    fn test_try_create_returns_typed_error() {
        let (f, _seen) = factory();
        let err = f.try_create_loader("docx").unwrap_err();
        assert_eq!(
            err,
            FactoryError::Unsupported {
                tag: "docx".to_string()
            }
        );
    }
}
