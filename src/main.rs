// DataLoader - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Pipeline wiring through app::session
// 4. Loading each input and printing a preview

use dataloader::app::session::{OutputChoice, Session};
use dataloader::core::logger::Logger;
use dataloader::core::model::{format_line, LoadedData};
use dataloader::core::notify::ConsoleObserver;
use dataloader::core::severity::Threshold;
use dataloader::platform::config::{self, AppConfig, OutputSetting, PlatformPaths};
use dataloader::platform::fs;
use dataloader::util::constants;
use dataloader::util::error::{ConfigError, DataLoaderError, Result};
use dataloader::util::logging;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// DataLoader - load tabular and document files through a severity-filtered
/// logging pipeline.
///
/// Every load is reported on the log channel (console or file, filtered by
/// threshold, with error and warning persisters) and on the notification
/// channel (unfiltered).
#[derive(Parser, Debug)]
#[command(name = "DataLoader", version, about)]
struct Cli {
    /// Files or directories to load. Directories are searched for
    /// csv, json, html, xml and pdf files.
    paths: Vec<PathBuf>,

    /// Log output: none, console or file (overrides config).
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Minimum severity written to the log: info, update, warning, error or all.
    #[arg(short = 't', long = "threshold")]
    threshold: Option<String>,

    /// Log file used by the file output.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// File shared by the error and warning persisters.
    #[arg(long = "shared-log-file")]
    shared_log_file: Option<PathBuf>,

    /// Alternative config.toml.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Echo every notification to stdout.
    #[arg(short = 'e', long = "echo")]
    echo: bool,

    /// Print loaded data as JSON instead of a preview.
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Replay the UI log buffer after all files are loaded.
    #[arg(short = 'r', long = "replay")]
    replay: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "DataLoader failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let platform_paths = PlatformPaths::resolve();

    // Config comes first so its [logging] level can seed the subscriber.
    let config_path = match cli.config {
        Some(ref path) => {
            if !path.exists() {
                return Err(ConfigError::Io {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "config file not found",
                    ),
                }
                .into());
            }
            path.clone()
        }
        None => platform_paths.config_file(),
    };
    let (app_config, config_warnings) = config::load_config(&config_path, &platform_paths);

    logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "DataLoader starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let (output, threshold) = resolve_pipeline(&cli, &app_config)?;
    let shared_log_file = cli
        .shared_log_file
        .clone()
        .unwrap_or_else(|| app_config.shared_log_file.clone());

    ensure_parent(&shared_log_file)?;
    if let OutputChoice::File(ref path) = output {
        ensure_parent(path)?;
    }

    let mut session = Session::new(Logger::global(), &shared_log_file);
    if cli.echo {
        session.attach_observer(Arc::new(ConsoleObserver));
    }
    session.start(output, threshold)?;

    let (files, walk_warnings) = fs::collect_inputs(&cli.paths, app_config.max_depth);
    for warning in &walk_warnings {
        tracing::warn!(warning = %warning, "Discovery warning");
    }

    let mut loaded = 0usize;
    for path in &files {
        match session.load_path(path) {
            Ok(Some(data)) => {
                loaded += 1;
                if cli.json {
                    print_json(path, &data);
                } else {
                    print_preview(path, &data);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(path = %path.display(), error = %e, "Load skipped"),
        }
    }

    if cli.replay {
        for (text, level) in session.ui_logs() {
            println!("{}", format_line(&text, level));
        }
    }

    tracing::info!(
        loaded,
        total = files.len(),
        buffered = session.ui_logs().len(),
        "DataLoader finished"
    );
    Ok(())
}

/// Merge CLI overrides over the config file.
fn resolve_pipeline(cli: &Cli, app_config: &AppConfig) -> Result<(OutputChoice, Threshold)> {
    let setting = match cli.output {
        Some(ref name) => {
            OutputSetting::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
                field: "--output".to_string(),
                value: name.clone(),
                expected: "none, console or file".to_string(),
            })?
        }
        None => app_config.output,
    };

    let threshold = match cli.threshold {
        Some(ref name) => Threshold::from_name(name).ok_or_else(|| ConfigError::InvalidValue {
            field: "--threshold".to_string(),
            value: name.clone(),
            expected: "info, update, warning, error or all".to_string(),
        })?,
        None => app_config.threshold,
    };

    let output = match setting {
        OutputSetting::None => OutputChoice::None,
        OutputSetting::Console => OutputChoice::Console,
        OutputSetting::File => OutputChoice::File(
            cli.log_file
                .clone()
                .unwrap_or_else(|| app_config.log_file.clone()),
        ),
    };

    Ok((output, threshold))
}

/// Create the directory a log file will be appended in.
fn ensure_parent(file: &Path) -> Result<()> {
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    std::fs::create_dir_all(parent).map_err(|source| DataLoaderError::Io {
        path: parent.to_path_buf(),
        operation: "create log directory",
        source,
    })
}

fn print_json(path: &Path, data: &LoadedData) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "JSON rendering failed"),
    }
}

fn print_preview(path: &Path, data: &LoadedData) {
    println!("== {} ==", path.display());
    match data {
        LoadedData::Table(table) => {
            println!("{}", table.columns.join(" | "));
            for row in table.rows.iter().take(constants::PREVIEW_ROWS) {
                println!("{}", row.join(" | "));
            }
            if table.row_count() > constants::PREVIEW_ROWS {
                println!("... ({} more rows)", table.row_count() - constants::PREVIEW_ROWS);
            }
        }
        LoadedData::Text(text) => {
            let preview: String = text.chars().take(constants::PREVIEW_CHARS).collect();
            println!("{preview}");
            if text.chars().count() > constants::PREVIEW_CHARS {
                println!("...");
            }
        }
    }
}
