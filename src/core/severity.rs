// DataLoader - core/severity.rs
//
// Ordered severity levels and the threshold test applied by the Logger.
// Pure logic, no I/O.

use crate::util::constants::{ALL_KEYWORD, ALL_RANK};
use serde::{Deserialize, Serialize};

/// Severity of a pipeline message, ordered from least to most severe.
///
/// Ranks are fixed: Info = 1, Update = 2, Warning = 3, Error = 4.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Update,
    Warning,
    Error,
}

impl Severity {
    /// All variants in rank order.
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Info,
            Severity::Update,
            Severity::Warning,
            Severity::Error,
        ]
    }

    /// Integer rank used for threshold comparisons.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Update => 2,
            Severity::Warning => 3,
            Severity::Error => 4,
        }
    }

    /// Lowercase name, as used by the notification channel and config.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Update => "update",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Uppercase label used in rendered lines (`[LEVEL] text`).
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Update => "UPDATE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }

    /// Parse a level name, case-insensitively.
    ///
    /// Unknown names resolve to `Info` rather than failing.
    pub fn from_name_lossy(name: &str) -> Severity {
        match name.trim().to_lowercase().as_str() {
            "info" => Severity::Info,
            "update" => Severity::Update,
            "warning" | "warn" => Severity::Warning,
            "error" => Severity::Error,
            other => {
                tracing::debug!(level = other, "Unknown severity name, using info");
                Severity::Info
            }
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum severity a message needs to pass the Logger's filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Threshold {
    /// Every message passes (rank 0).
    All,

    /// Messages at or above this severity pass.
    AtLeast(Severity),
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::AtLeast(Severity::Info)
    }
}

impl Threshold {
    /// Rank compared against `Severity::rank`.
    pub fn rank(&self) -> u8 {
        match self {
            Threshold::All => ALL_RANK,
            Threshold::AtLeast(s) => s.rank(),
        }
    }

    /// Parse `"all"` or a severity name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Threshold> {
        let name = name.trim().to_lowercase();
        if name == ALL_KEYWORD {
            return Some(Threshold::All);
        }
        Severity::all()
            .iter()
            .find(|s| s.name() == name)
            .map(|s| Threshold::AtLeast(*s))
    }

    /// Like [`Threshold::from_name`], but unknown names resolve to Info.
    pub fn from_name_lossy(name: &str) -> Threshold {
        if name.trim().eq_ignore_ascii_case(ALL_KEYWORD) {
            Threshold::All
        } else {
            Threshold::AtLeast(Severity::from_name_lossy(name))
        }
    }
}

impl From<Severity> for Threshold {
    fn from(s: Severity) -> Self {
        Threshold::AtLeast(s)
    }
}

/// Rank of a severity level.
pub fn rank(level: Severity) -> u8 {
    level.rank()
}

/// `true` when `level` is allowed through by `threshold`.
pub fn passes(level: Severity, threshold: Threshold) -> bool {
    let t = threshold.rank();
    t == ALL_RANK || level.rank() >= t
}
