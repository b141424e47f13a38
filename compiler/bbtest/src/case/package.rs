//! Moving generated sources into their derived package.

use std::path::Path;

use super::TestFile;
use crate::DiscoveryError;

/// Where the scan of a source file stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    Code,
    BlockComment,
}

/// Ensure `file` declares `package_name`.
///
/// The first meaningful line (blank lines and comments skipped) is examined:
/// a `package` declaration there must name `package_name` exactly, otherwise
/// the file gets `package <name> ` prepended to its first line so no line
/// numbers move.
pub(crate) fn fix_package_declaration(
    file: TestFile,
    package_name: &str,
    test_data_file: &Path,
) -> Result<TestFile, DiscoveryError> {
    let Some((index, declared)) = find_package_declaration(&file.contents) else {
        let contents = format!("package {package_name} {}", file.contents);
        return Ok(TestFile { contents, ..file });
    };

    if declared != package_name {
        return Err(DiscoveryError::PackageMismatch {
            test_data_file: test_data_file.to_path_buf(),
            file_name: file.name,
            line: index + 1,
            found: declared.to_string(),
            expected: package_name.to_string(),
        });
    }
    Ok(file)
}

/// 0-based line index and name of the package declared on the first
/// meaningful line, if that line is a package declaration.
fn find_package_declaration(contents: &str) -> Option<(usize, &str)> {
    let mut state = ScanState::Code;

    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        match state {
            ScanState::BlockComment => {
                if trimmed.ends_with("*/") {
                    state = ScanState::Code;
                }
            }
            ScanState::Code if trimmed.is_empty() || trimmed.starts_with("//") => {}
            ScanState::Code if trimmed.starts_with("/*") => {
                if !trimmed[2..].contains("*/") {
                    state = ScanState::BlockComment;
                }
            }
            ScanState::Code => {
                let declared = trimmed.strip_prefix("package ")?;
                let declared = declared.trim().trim_end_matches(';').trim_end();
                return Some((index, declared));
            }
        }
    }
    None
}
