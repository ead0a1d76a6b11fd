// DataLoader - util/constants.rs
//
// Single source of truth for named constants, file names, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DataLoader";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DataLoader";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Severity ranks
// =============================================================================

/// Rank of the "all" threshold. Every message passes.
pub const ALL_RANK: u8 = 0;

/// Threshold keyword that maps to [`ALL_RANK`].
pub const ALL_KEYWORD: &str = "all";

// =============================================================================
// Files
// =============================================================================

/// Config file name inside the platform config dir.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default file name for the file output strategy.
pub const DEFAULT_LOG_FILE_NAME: &str = "log.txt";

/// Default file name shared by the error and warning persisters.
pub const DEFAULT_SHARED_LOG_FILE_NAME: &str = "error_warninglog.txt";

/// File extensions accepted when walking a directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json", "html", "xml", "pdf"];

// =============================================================================
// Limits
// =============================================================================

/// Maximum directory recursion depth when a directory is given on the CLI.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Hard upper bound on walk depth.
pub const ABSOLUTE_MAX_DEPTH: usize = 32;

/// Maximum input size accepted by a loader (bytes).
pub const MAX_INPUT_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

/// Number of table rows printed by the CLI preview.
pub const PREVIEW_ROWS: usize = 10;

/// Number of characters printed by the CLI preview for text results.
pub const PREVIEW_CHARS: usize = 2_000;

// =============================================================================
// Messages
// =============================================================================

/// Emitted on both channels when a session starts.
pub const MSG_PROGRAM_STARTED: &str = "Program started";

// =============================================================================
// Diagnostic logging
// =============================================================================

/// Default tracing filter when neither RUST_LOG, --debug nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
