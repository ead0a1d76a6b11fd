// DataLoader - core/loader.rs
//
// Format loaders. Every loader follows the same policy:
//   parse -> on success report "<FORMAT> file loaded: <name>" at INFO
//         -> on failure report "Error loading <FORMAT> file: <detail>" at
//            ERROR and return None
// Reports go to both the Logger and the notification channel. Parse
// failures never escape a loader.

use crate::core::formats::FileFormat;
use crate::core::model::{LoadInput, LoadedData};
use crate::core::report::Reporter;
use crate::util::constants;
use crate::util::error::LoadError;

/// Loads one named input into tabular data or text.
pub trait Loader: Send + Sync + std::fmt::Debug {
    /// The format this loader parses.
    fn format(&self) -> FileFormat;

    /// Parse `input`, reporting the outcome. `None` means the load failed
    /// and was already reported.
    fn load(&self, input: &LoadInput) -> Option<LoadedData>;
}

/// The loader used for every `FileFormat`; the format's parser is chosen
/// by an exhaustive match in `FileFormat::parse`.
#[derive(Debug, Clone)]
pub struct FormatLoader {
    format: FileFormat,
    reporter: Reporter,
    max_input_size: u64,
}

impl FormatLoader {
    pub fn new(format: FileFormat, reporter: Reporter) -> Self {
        Self {
            format,
            reporter,
            max_input_size: constants::MAX_INPUT_SIZE,
        }
    }

    pub fn with_max_input_size(mut self, max: u64) -> Self {
        self.max_input_size = max;
        self
    }

    fn try_load(&self, input: &LoadInput) -> Result<LoadedData, LoadError> {
        let size = input.bytes.len() as u64;
        if size > self.max_input_size {
            return Err(LoadError::TooLarge {
                size,
                max: self.max_input_size,
            });
        }
        self.format.parse(&input.bytes)
    }
}

impl Loader for FormatLoader {
    fn format(&self) -> FileFormat {
        self.format
    }

    fn load(&self, input: &LoadInput) -> Option<LoadedData> {
        let label = self.format.label();
        match self.try_load(input) {
            Ok(data) => {
                tracing::debug!(format = label, name = %input.name, "Load succeeded");
                self.reporter
                    .info(&format!("{label} file loaded: {}", input.name));
                Some(data)
            }
            Err(e) => {
                tracing::debug!(format = label, name = %input.name, error = %e, "Load failed");
                self.reporter
                    .error(&format!("Error loading {label} file: {e}"));
                None
            }
        }
    }
}
