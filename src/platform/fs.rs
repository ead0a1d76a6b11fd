// DataLoader - platform/fs.rs
//
// Filesystem helpers for the CLI: expanding directory arguments into the
// loadable files beneath them.

use crate::util::constants;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `true` if the file's extension is one a loader exists for.
pub fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            constants::SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

/// Expand `inputs` into a file list.
///
/// Files are kept as given, whatever their extension, so unsupported ones
/// still reach the factory and get reported. Directories are walked up to
/// `max_depth` and contribute only files with supported extensions, in
/// sorted order. Traversal errors become warnings.
pub fn collect_inputs(inputs: &[PathBuf], max_depth: usize) -> (Vec<PathBuf>, Vec<String>) {
    let mut files = Vec::new();
    let mut warnings = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found = 0usize;
        for entry in WalkDir::new(input)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && has_supported_extension(entry.path()) {
                        files.push(entry.into_path());
                        found += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(root = %input.display(), error = %e, "Walk error");
                    warnings.push(format!("Error traversing '{}': {e}", input.display()));
                }
            }
        }
        tracing::debug!(root = %input.display(), found, "Directory expanded");
    }

    (files, warnings)
}
