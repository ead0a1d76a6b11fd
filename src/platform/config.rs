// DataLoader - platform/config.rs
//
// Platform data directory resolution and config.toml loading with
// start-up validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::severity::{Severity, Threshold};
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DataLoader configuration and log files.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/dataloader/)
    pub config_dir: PathBuf,

    /// Data directory; default home of the log files.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be
    /// determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    pub fn default_log_file(&self) -> PathBuf {
        self.data_dir.join(constants::DEFAULT_LOG_FILE_NAME)
    }

    pub fn default_shared_log_file(&self) -> PathBuf {
        self.data_dir.join(constants::DEFAULT_SHARED_LOG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[pipeline]` section.
    pub pipeline: PipelineSection,
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[pipeline]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    /// "none", "console" or "file".
    pub output: Option<String>,
    /// "info", "update", "warning", "error" or "all".
    pub threshold: Option<String>,
    /// Target of the file output.
    pub log_file: Option<String>,
    /// File shared by the error and warning persisters.
    pub shared_log_file: Option<String>,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
}

/// `[logging]` config section (diagnostics, not the pipeline).
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Pipeline output as configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSetting {
    #[default]
    None,
    Console,
    File,
}

impl OutputSetting {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(OutputSetting::None),
            "console" => Some(OutputSetting::Console),
            "file" => Some(OutputSetting::File),
            _ => None,
        }
    }
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Pipeline --
    pub output: OutputSetting,
    pub threshold: Threshold,
    pub log_file: PathBuf,
    pub shared_log_file: PathBuf,

    // -- Discovery --
    pub max_depth: usize,

    // -- Logging --
    /// Diagnostic level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Defaults rooted at the platform data directory.
    pub fn defaults(paths: &PlatformPaths) -> Self {
        Self {
            output: OutputSetting::None,
            threshold: Threshold::AtLeast(Severity::Info),
            log_file: paths.default_log_file(),
            shared_log_file: paths.default_shared_log_file(),
            max_depth: constants::DEFAULT_MAX_DEPTH,
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns the validated config and a list of non-fatal warnings. A
/// missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults and one warning.
pub fn load_config(config_path: &Path, paths: &PlatformPaths) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::defaults(paths), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::defaults(paths), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::defaults(paths), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, paths, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Apply every valid field of `raw` over the defaults.
fn validate(raw: RawConfig, paths: &PlatformPaths, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::defaults(paths);

    // -- Pipeline: output --
    if let Some(ref output) = raw.pipeline.output {
        match OutputSetting::from_name(output) {
            Some(setting) => config.output = setting,
            None => warnings.push(format!(
                "[pipeline] output = \"{output}\" is not recognised. \
                 Expected \"none\", \"console\" or \"file\". Using default (none).",
            )),
        }
    }

    // -- Pipeline: threshold --
    if let Some(ref threshold) = raw.pipeline.threshold {
        match Threshold::from_name(threshold) {
            Some(t) => config.threshold = t,
            None => warnings.push(format!(
                "[pipeline] threshold = \"{threshold}\" is not recognised. \
                 Valid values: info, update, warning, error, all. Using info.",
            )),
        }
    }

    // -- Pipeline: file paths --
    if let Some(ref file) = raw.pipeline.log_file {
        if !file.is_empty() {
            config.log_file = PathBuf::from(file);
        }
    }
    if let Some(ref file) = raw.pipeline.shared_log_file {
        if !file.is_empty() {
            config.shared_log_file = PathBuf::from(file);
        }
    }

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}
