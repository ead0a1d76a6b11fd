// DataLoader - tests/e2e_pipeline.rs
//
// End-to-end tests for the logging pipeline and the loaders.
//
// These tests exercise the real filesystem, the real on-disk fixtures and
// the real format parsers. Each test builds its own Logger so thresholds
// and subscribers never leak between tests.

use dataloader::app::session::{OutputChoice, Session};
use dataloader::core::factory::LoaderFactory;
use dataloader::core::formats::FileFormat;
use dataloader::core::logger::{Dispatch, Logger};
use dataloader::core::model::LoadInput;
use dataloader::core::notify::{Observer, Subject};
use dataloader::core::output::{AppendLog, FileOutput};
use dataloader::core::report::Reporter;
use dataloader::core::severity::{Severity, Threshold};
use dataloader::core::subscriber::{SeverityPersister, UiBuffer};
use dataloader::platform::fs::collect_inputs;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Observer recording every notification in arrival order.
#[derive(Debug, Default)]
struct Recorder {
    seen: Mutex<Vec<(String, Severity)>>,
}

impl Recorder {
    fn seen(&self) -> Vec<(String, Severity)> {
        self.seen.lock().unwrap().clone()
    }
}

impl Observer for Recorder {
    fn update(&self, message: &str, level: Severity) {
        self.seen.lock().unwrap().push((message.to_string(), level));
    }
}

fn started_session(dir: &std::path::Path, threshold: Threshold) -> (Session, PathBuf, PathBuf) {
    let log = dir.join("log.txt");
    let shared = dir.join("error_warninglog.txt");
    let mut session = Session::new(Arc::new(Logger::new()), &shared);
    session
        .start(OutputChoice::File(log.clone()), threshold)
        .unwrap();
    (session, log, shared)
}

// =============================================================================
// Logger E2E
// =============================================================================

/// With a WARNING threshold and a file output, only the error reaches the
/// log file, and the error persister records it.
#[test]
fn e2e_threshold_filters_file_output_and_persisters() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("log.txt");
    let shared_path = dir.path().join("error_warninglog.txt");

    let logger = Logger::new();
    let shared = AppendLog::shared(&shared_path);
    logger.set_output_strategy(Arc::new(FileOutput::new(&log_path)));
    logger.set_threshold(Severity::Warning);
    logger.add_subscriber(Arc::new(SeverityPersister::error_only(Arc::clone(&shared))));
    logger.add_subscriber(Arc::new(SeverityPersister::warning_only(shared)));

    assert_eq!(logger.info("a").unwrap(), Dispatch::Filtered);
    assert!(matches!(
        logger.error("b").unwrap(),
        Dispatch::Delivered { subscribers: 2 }
    ));

    assert_eq!(fs::read_to_string(&log_path).unwrap(), "[ERROR] b\n");
    assert_eq!(fs::read_to_string(&shared_path).unwrap(), "[ERROR] b\n");
}

/// Without an output strategy the Logger drops everything, but the
/// notification channel still delivers.
#[test]
fn e2e_no_output_still_notifies() {
    let logger = Arc::new(Logger::new());
    let ui = Arc::new(UiBuffer::new());
    logger.add_subscriber(ui.clone());

    let subject = Arc::new(Subject::new());
    let recorder = Arc::new(Recorder::default());
    subject.attach(recorder.clone());

    let reporter = Reporter::new(Arc::clone(&logger), subject);
    assert_eq!(reporter.info("hello"), Some(Dispatch::NoOutput));

    assert!(ui.is_empty());
    assert_eq!(recorder.seen(), vec![("hello".to_string(), Severity::Info)]);
}

/// Warnings and errors share one persister file, in emission order.
#[test]
fn e2e_shared_persister_file_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let (session, log, shared) = started_session(dir.path(), Threshold::All);

    session.reporter().warning("w1");
    session.reporter().update("u1");
    session.reporter().error("e1");
    session.reporter().warning("w2");

    assert_eq!(
        fs::read_to_string(&shared).unwrap(),
        "[WARNING] w1\n[ERROR] e1\n[WARNING] w2\n"
    );
    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "[INFO] Program started\n[WARNING] w1\n[UPDATE] u1\n[ERROR] e1\n[WARNING] w2\n"
    );

    let ui_levels: Vec<Severity> = session.ui_logs().iter().map(|(_, l)| *l).collect();
    assert_eq!(
        ui_levels,
        vec![
            Severity::Info,
            Severity::Warning,
            Severity::Update,
            Severity::Warning
        ]
    );
}

// =============================================================================
// Loader E2E
// =============================================================================

/// Every fixture loads through the session and reports at INFO.
#[test]
fn e2e_loads_tabular_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    let (session, log, _shared) = started_session(dir.path(), Threshold::All);

    let csv = session.load_path(&fixture("people.csv")).unwrap().unwrap();
    let csv = csv.as_table().unwrap();
    assert_eq!(csv.columns, vec!["name", "age", "city"]);
    assert_eq!(csv.row_count(), 3);

    let json = session.load_path(&fixture("people.json")).unwrap().unwrap();
    let json = json.as_table().unwrap();
    assert_eq!(json.columns, vec!["name", "age", "city"]);
    assert_eq!(json.rows[1], vec!["Bob", "42", "York"]);

    let html = session.load_path(&fixture("cities.html")).unwrap().unwrap();
    let html = html.as_table().unwrap();
    assert_eq!(html.columns, vec!["city", "county"]);
    assert_eq!(html.rows[0], vec!["Leeds", "West Yorkshire"]);

    let xml = session.load_path(&fixture("people.xml")).unwrap().unwrap();
    let xml = xml.as_table().unwrap();
    assert_eq!(xml.columns, vec!["name", "age"]);
    assert_eq!(xml.rows, vec![vec!["Ann", "31"], vec!["Bob", "42"]]);

    let logged = fs::read_to_string(&log).unwrap();
    for line in [
        "[INFO] CSV file loaded: people.csv",
        "[INFO] JSON file loaded: people.json",
        "[INFO] HTML file loaded: cities.html",
        "[INFO] XML file loaded: people.xml",
    ] {
        assert!(logged.contains(line), "missing {line:?} in {logged:?}");
    }
}

/// A malformed file is reported at ERROR on both channels and yields
/// nothing.
#[test]
fn e2e_malformed_input_reported() {
    let dir = tempfile::tempdir().unwrap();
    let (session, _log, shared) = started_session(dir.path(), Threshold::All);
    let recorder = Arc::new(Recorder::default());
    session.attach_observer(recorder.clone());

    let result = session
        .load_input(&LoadInput::new("broken.json", "{not json"))
        .unwrap();
    assert!(result.is_none());

    let persisted = fs::read_to_string(&shared).unwrap();
    assert!(persisted.starts_with("[ERROR] Error loading JSON file: "));

    let seen = recorder.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, Severity::Error);
    assert!(seen[0].0.starts_with("Error loading JSON file: "));
}

/// An unsupported tag is reported on both channels.
#[test]
fn e2e_unsupported_tag_reported_on_both_channels() {
    let dir = tempfile::tempdir().unwrap();
    let (session, log, shared) = started_session(dir.path(), Threshold::All);
    let recorder = Arc::new(Recorder::default());
    session.attach_observer(recorder.clone());

    assert!(session.factory().create_loader("zip").is_none());

    let expected = "[ERROR] Unsupported file type: zip\n";
    assert!(fs::read_to_string(&log).unwrap().ends_with(expected));
    assert_eq!(fs::read_to_string(&shared).unwrap(), expected);
    assert_eq!(
        recorder.seen(),
        vec![("Unsupported file type: zip".to_string(), Severity::Error)]
    );
}

/// Every supported tag yields a loader for its own format.
#[test]
fn e2e_factory_covers_every_format() {
    let subject = Arc::new(Subject::new());
    let factory = LoaderFactory::new(Reporter::new(Arc::new(Logger::new()), subject));

    for format in FileFormat::all() {
        let loader = factory
            .create_loader(format.tag())
            .unwrap_or_else(|| panic!("no loader for {format}"));
        assert_eq!(loader.format(), *format);
    }
}

// =============================================================================
// Discovery E2E
// =============================================================================

/// Walking the fixtures directory finds every fixture, in name order.
#[test]
fn e2e_discovers_fixture_files() {
    let fixtures_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    let (files, warnings) = collect_inputs(&[fixtures_dir], 1);
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["cities.html", "people.csv", "people.json", "people.xml"]
    );
}
