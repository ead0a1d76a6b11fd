// DataLoader - util/logging.rs
//
// Diagnostic logging for the application itself (not the domain Logger in
// core::logger, which is the user-facing pipeline).
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Never logs loaded data contents at any level.

use tracing_subscriber::EnvFilter;

/// Pick the tracing filter directive.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default.
fn filter_for(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    }
}

/// Initialise the diagnostic logging subsystem.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter_for(debug_flag, config_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init();

    if result.is_ok() {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
}
