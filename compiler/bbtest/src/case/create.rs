//! Classifying one test-data file.

use std::fs;
use std::path::{Path, PathBuf};

use bb_directives::{split, Directive};

use super::{
    fix_package_declaration, FreeCompilerArgs, PackageName, RegularCase, SimpleTestCase,
    StandaloneCase, TestFile,
};
use crate::{DiscoveryError, TestEnvironment};

/// Read, split and classify the test-data file at `test_data_file`.
///
/// Generated files are placed (not yet written) under
/// `<test sources dir>/<relative dir>/<stem>/`. Without `STANDALONE` every file
/// is moved into the package derived from the test-data file's path.
pub fn create_simple_test_case(
    test_data_file: &Path,
    env: &TestEnvironment,
) -> Result<SimpleTestCase, DiscoveryError> {
    let relative = relative_test_dir(test_data_file, env.tests_root())?;
    let package_name = derive_package_name(&relative);
    let generated_sources_dir = env.test_sources_dir().join(&relative);

    let text =
        fs::read_to_string(test_data_file).map_err(|e| DiscoveryError::io(test_data_file, &e))?;
    let output = split(test_data_file, &text)?;

    let files: Vec<TestFile> = output
        .files
        .into_iter()
        .map(|file| TestFile {
            location: generated_sources_dir.join(&file.name),
            name: file.name,
            contents: file.contents,
        })
        .collect();

    let free_compiler_args: FreeCompilerArgs = output
        .directives
        .values(Directive::FreeCompilerArgs)
        .iter()
        .cloned()
        .collect();

    tracing::debug!(
        file = %test_data_file.display(),
        files = files.len(),
        standalone = output.directives.contains(Directive::Standalone),
        "classified test-data file"
    );

    if output.directives.contains(Directive::Standalone) {
        return Ok(SimpleTestCase::Standalone(StandaloneCase {
            files,
            free_compiler_args,
            test_data_file: test_data_file.to_path_buf(),
        }));
    }

    let files = files
        .into_iter()
        .map(|file| fix_package_declaration(file, &package_name, test_data_file))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimpleTestCase::Regular(RegularCase {
        files,
        free_compiler_args,
        test_data_file: test_data_file.to_path_buf(),
        package_name,
    }))
}

/// `<parent>/<stem>` of `test_data_file`, relative to `tests_root`.
fn relative_test_dir(test_data_file: &Path, tests_root: &Path) -> Result<PathBuf, DiscoveryError> {
    let outside = || DiscoveryError::OutsideTestsRoot {
        path: test_data_file.to_path_buf(),
        root: tests_root.to_path_buf(),
    };

    let stem = test_data_file.file_stem().ok_or_else(outside)?;
    let parent = test_data_file
        .parent()
        .and_then(|parent| parent.strip_prefix(tests_root).ok())
        .ok_or_else(outside)?;
    Ok(parent.join(stem))
}

/// Path components joined with `.`: `codegen/box/simple` → `codegen.box.simple`.
pub(crate) fn derive_package_name(relative: &Path) -> PackageName {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
