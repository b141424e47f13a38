//! Deterministic executable names.

use std::hash::{Hash, Hasher};
use std::path::Path;

use bb_compiler::Target;
use rustc_hash::FxHasher;

use crate::TestCase;

/// How many test-data file stems go into a name.
const MAX_STEMS: usize = 3;

/// File name of the executable built for `case`.
///
/// `{count:03}-{stems}-{hash}.{suffix}`: the number of test-data files, up to
/// three of their stems in sorted order, and a hex hash over all of their
/// paths. The hash is a wrapping sum, so member order does not matter.
pub fn stable_executable_file_name(case: &TestCase, target: &Target) -> String {
    let test_data_files = case.test_data_files();

    let mut stems: Vec<String> = test_data_files
        .iter()
        .filter_map(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .collect();
    stems.sort();
    stems.truncate(MAX_STEMS);

    let hash = test_data_files
        .iter()
        .fold(0u64, |acc, path| acc.wrapping_add(path_hash(path)));

    format!(
        "{:03}-{}-{hash:x}.{}",
        test_data_files.len(),
        stems.join("_"),
        target.exe_suffix()
    )
}

fn path_hash(path: &Path) -> u64 {
    let mut hasher = FxHasher::default();
    path.to_string_lossy().as_bytes().hash(&mut hasher);
    hasher.finish()
}
