//! Test-data file discovery.
//!
//! Every `.kt` file below the tests root is a test-data file.

use std::fs;
use std::path::{Path, PathBuf};

use bb_directives::SOURCE_EXTENSION;

/// Discover all test-data files below `root`, sorted by path.
///
/// A `root` that is itself a test-data file yields just that file.
pub fn discover_test_data_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return if is_test_data_file(root) {
            vec![root.to_path_buf()]
        } else {
            vec![]
        };
    }

    let mut files = Vec::new();
    discover_recursive(root, &mut files);
    files.sort();
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'))
        {
            continue;
        }

        if path.is_dir() {
            discover_recursive(&path, files);
        } else if is_test_data_file(&path) {
            files.push(path);
        }
    }
}

fn is_test_data_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == SOURCE_EXTENSION)
}
