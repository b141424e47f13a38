//! Validation errors for malformed directive usage.

use std::fmt;
use std::path::PathBuf;

use crate::Directive;

/// A directive in a test-data file is used incorrectly.
///
/// `line` is 1-based so the location can be pasted straight into an editor.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}:{line}: {kind}", .path.display())]
pub struct ValidationError {
    /// The test-data file containing the directive.
    pub path: PathBuf,
    /// 1-based line of the offending directive.
    pub line: usize,
    /// What is wrong with it.
    pub kind: ValidationErrorKind,
}

/// The specific validation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationErrorKind {
    /// `FILE` needs exactly one value.
    #[error(
        "exactly one file name expected in {} directive: {}\n{}",
        Directive::File,
        Values(.found),
        Directive::File.description()
    )]
    FileArity { found: Vec<String> },
    /// `FILE` value is not a plain `*.kt` name.
    #[error("invalid file name in {} directive: {name}", Directive::File)]
    InvalidFileName { name: String },
    /// `FILE` repeats a name already used in the same test-data file.
    #[error("duplicate file name in {} directive: {name}", Directive::File)]
    DuplicateFileName { name: String },
    /// A marker directive was given values.
    #[error("{directive} directive takes no arguments: {}", Values(.found))]
    UnexpectedArguments {
        directive: Directive,
        found: Vec<String>,
    },
}

/// Renders directive values as `[a, b]`.
struct Values<'a>(&'a [String]);

impl fmt::Display for Values<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}
