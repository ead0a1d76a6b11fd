// DataLoader - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every variant keeps its cause so diagnostics can walk `source()`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all DataLoader operations.
#[derive(Debug)]
pub enum DataLoaderError {
    /// A log sink (output strategy or persister) failed to write.
    Sink(SinkError),

    /// A format collaborator failed to parse its input.
    Load(LoadError),

    /// The factory could not resolve a format tag.
    Factory(FactoryError),

    /// A table edit was rejected.
    Edit(EditError),

    /// The session refused an operation.
    Session(SessionError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for DataLoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sink(e) => write!(f, "Log sink error: {e}"),
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Factory(e) => write!(f, "Factory error: {e}"),
            Self::Edit(e) => write!(f, "Edit error: {e}"),
            Self::Session(e) => write!(f, "Session error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for DataLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Factory(e) => Some(e),
            Self::Edit(e) => Some(e),
            Self::Session(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Sink errors
// ---------------------------------------------------------------------------

/// A log sink could not write a message.
#[derive(Debug)]
pub enum SinkError {
    /// Opening or appending to a log file failed.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot append to '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<SinkError> for DataLoaderError {
    fn from(e: SinkError) -> Self {
        Self::Sink(e)
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Failures reported by the format collaborators.
///
/// The `Display` text is the `<detail>` part of the
/// "Error loading <FORMAT> file: <detail>" message.
#[derive(Debug)]
pub enum LoadError {
    /// CSV reader failure.
    Csv(csv::Error),

    /// JSON syntax or data error.
    Json(serde_json::Error),

    /// XML reader failure.
    Xml(quick_xml::Error),

    /// PDF structure or text extraction failure.
    Pdf(lopdf::Error),

    /// The HTML document contained no `<table>` element.
    NoTables,

    /// The input had no columns to parse.
    Empty,

    /// The input parsed but does not have a tabular shape.
    Shape { reason: String },

    /// The input is not valid UTF-8.
    Encoding(std::str::Utf8Error),

    /// The input exceeds the configured maximum size.
    TooLarge { size: u64, max: u64 },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "{e}"),
            Self::Json(e) => write!(f, "{e}"),
            Self::Xml(e) => write!(f, "{e}"),
            Self::Pdf(e) => write!(f, "{e}"),
            Self::NoTables => f.write_str("No tables found"),
            Self::Empty => f.write_str("No columns to parse from file"),
            Self::Shape { reason } => f.write_str(reason),
            Self::Encoding(e) => write!(f, "invalid UTF-8: {e}"),
            Self::TooLarge { size, max } => {
                write!(f, "input is {size} bytes, exceeds maximum of {max} bytes")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Xml(e) => Some(e),
            Self::Pdf(e) => Some(e),
            Self::Encoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e)
    }
}

impl From<lopdf::Error> for LoadError {
    fn from(e: lopdf::Error) -> Self {
        Self::Pdf(e)
    }
}

impl From<std::str::Utf8Error> for LoadError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Encoding(e)
    }
}

impl From<LoadError> for DataLoaderError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Factory errors
// ---------------------------------------------------------------------------

/// The factory could not resolve a format tag to a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No loader exists for this tag.
    Unsupported { tag: String },
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported { tag } => write!(f, "Unsupported file type: {tag}"),
        }
    }
}

impl std::error::Error for FactoryError {}

impl From<FactoryError> for DataLoaderError {
    fn from(e: FactoryError) -> Self {
        Self::Factory(e)
    }
}

// ---------------------------------------------------------------------------
// Edit errors
// ---------------------------------------------------------------------------

/// Table edits that were rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Row index is outside the table (1-based).
    RowOutOfRange { row: usize, rows: usize },

    /// Value count does not match the column count.
    WidthMismatch { expected: usize, actual: usize },

    /// Adding the row would introduce a duplicate.
    Duplicate,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row, rows } => {
                write!(f, "row {row} is out of range (table has {rows} rows)")
            }
            Self::WidthMismatch { expected, actual } => {
                write!(f, "expected {expected} values, got {actual}")
            }
            Self::Duplicate => f.write_str("Cannot add duplicates in singleton"),
        }
    }
}

impl std::error::Error for EditError {}

impl From<EditError> for DataLoaderError {
    fn from(e: EditError) -> Self {
        Self::Edit(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Operations the session refuses.
#[derive(Debug)]
pub enum SessionError {
    /// `start` was asked to run without an output method.
    NoOutput,

    /// A file was loaded before the session was started.
    NotStarted,

    /// The input file could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOutput => f.write_str(
                "Please select a logging method before starting the program.",
            ),
            Self::NotStarted => f.write_str(
                "Please select a log method and start the program before loading a file.",
            ),
            Self::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<SessionError> for DataLoaderError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// A config value is not one of the accepted values.
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is not valid. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for DataLoaderError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for DataLoader results.
pub type Result<T> = std::result::Result<T, DataLoaderError>;
