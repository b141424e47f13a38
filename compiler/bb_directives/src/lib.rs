//! Directive parsing and file splitting for black-box test data.
//!
//! A test-data file is ordinary source text with a handful of comment
//! directives mixed in:
//!
//! ```text
//! // STANDALONE
//! // FREE_COMPILER_ARGS: -opt-in=kotlin.RequiresOptIn
//! // FILE: lib.kt
//! fun answer() = 42
//!
//! // FILE: main.kt
//! fun box() = if (answer() == 42) "OK" else "FAIL"
//! ```
//!
//! [`split`] turns such a file into an ordered list of [`SplitFile`]s plus the
//! [`RegisteredDirectives`] found along the way. Every generated file keeps
//! the line numbering of the original test-data file, so compiler diagnostics
//! point back at the right line.
//!
//! This crate is standalone: the runner and the compiler boundary depend on
//! it, never the other way around.

mod directive;
mod error;
mod splitter;

pub use directive::{Directive, RawDirective, RegisteredDirectives};
pub use error::{ValidationError, ValidationErrorKind};
pub use splitter::{split, SplitFile, SplitOutput, Splitter};

/// Extension of source files in the test tree (without the dot).
pub const SOURCE_EXTENSION: &str = "kt";

/// Name given to the single file of a test-data file without `FILE` directives.
pub const DEFAULT_FILE_NAME: &str = "main.kt";
