// DataLoader - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::core::severity::Severity;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

// =============================================================================
// Log message
// =============================================================================

/// A single message flowing through the pipeline.
///
/// Built at each call site and dropped after dispatch unless an observer
/// chooses to buffer it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMessage {
    pub text: String,
    pub severity: Severity,
}

impl LogMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    /// Rendered form used by every sink: `[LEVEL] text`.
    pub fn render(&self) -> String {
        format_line(&self.text, self.severity)
    }
}

/// `[LEVEL] text`, without a trailing newline.
pub fn format_line(text: &str, severity: Severity) -> String {
    format!("[{}] {}", severity.label(), text)
}

// =============================================================================
// Loader input
// =============================================================================

/// A named byte stream handed to a loader.
///
/// `name` is the display name used in log messages.
#[derive(Debug, Clone)]
pub struct LoadInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl LoadInput {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its file name as the display name.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Lowercased extension of `name`, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }
}

// =============================================================================
// Load results
// =============================================================================

/// Structured tabular value: named columns and string cells.
///
/// Every row has exactly `columns.len()` cells; missing values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from records that may name different columns.
    ///
    /// Columns appear in first-seen order; absent cells are left empty.
    pub fn from_records(records: Vec<Vec<(String, String)>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for (key, _) in record {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|record| {
                let mut row = vec![String::new(); columns.len()];
                for (key, value) in record {
                    if let Some(idx) = columns.iter().position(|c| *c == key) {
                        row[idx] = value;
                    }
                }
                row
            })
            .collect();

        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if any two rows are identical.
    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.rows.len());
        self.rows.iter().any(|row| !seen.insert(row))
    }
}

/// What a successful load produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum LoadedData {
    /// Record set (csv, json, html, xml).
    Table(Table),

    /// Extracted text (pdf).
    Text(String),
}

impl LoadedData {
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            LoadedData::Table(t) => Some(t),
            LoadedData::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            LoadedData::Text(s) => Some(s),
            LoadedData::Table(_) => None,
        }
    }
}
