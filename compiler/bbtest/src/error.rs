//! Errors raised while discovering, compiling and running black-box tests.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use bb_compiler::CompilationError;
use bb_directives::ValidationError;

/// A test-data file could not be turned into a test case.
///
/// Scoped to the single offending file: discovery of its siblings continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "{}: file {file_name}, line {line}: package '{found}' does not match expected package '{expected}'",
        .test_data_file.display()
    )]
    PackageMismatch {
        test_data_file: PathBuf,
        file_name: String,
        /// 1-based.
        line: usize,
        found: String,
        expected: String,
    },

    #[error("{}: not under tests root {}", .path.display(), .root.display())]
    OutsideTestsRoot { path: PathBuf, root: PathBuf },

    #[error("{}: {message}", .path.display())]
    Io { path: PathBuf, message: String },
}

impl DiscoveryError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        DiscoveryError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Everything observed about one run of a test binary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunDetails {
    pub args: Vec<String>,
    /// `None` when the process was killed by a signal or never started.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for RunDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run arguments: {}", self.args.join(" "))?;
        match self.exit_code {
            Some(code) => writeln!(f, "Exit code: {code}")?,
            None => writeln!(f, "Exit code: <none>")?,
        }
        writeln!(f, "== BEGIN [STDOUT] ==")?;
        if !self.stdout.is_empty() {
            writeln!(f, "{}", self.stdout)?;
        }
        writeln!(f, "== END [STDOUT] ==")?;
        writeln!(f, "== BEGIN [STDERR] ==")?;
        if !self.stderr.is_empty() {
            writeln!(f, "{}", self.stderr)?;
        }
        write!(f, "== END [STDERR] ==")
    }
}

/// A test binary ran, but its run does not count as a pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("Failed to start test binary: {message}\n{details}")]
    Spawn { message: String, details: RunDetails },

    #[error("Process exited with non-zero code.\n{details}")]
    NonZeroExit { details: RunDetails },

    #[error("Non-empty error output.\n{details}")]
    NonEmptyStderr { details: RunDetails },

    #[error("Malformed test output at line {line_number}: {line}\n{details}")]
    MalformedOutput {
        line: String,
        /// 1-based line of stdout.
        line_number: usize,
        details: RunDetails,
    },

    #[error("No tests have been executed.\n{details}")]
    NoTestsExecuted { details: RunDetails },

    #[error("No passed tests.\n{details}")]
    NoPassedTests { details: RunDetails },

    #[error("Excessive tests have been executed: {}\n{details}", TestNames(.tests))]
    ExcessiveTests {
        tests: BTreeSet<String>,
        details: RunDetails,
    },

    #[error("There are failed tests ({count}): {}\n{details}", TestNames(.tests))]
    FailedTests {
        count: usize,
        tests: BTreeSet<String>,
        details: RunDetails,
    },
}

impl VerificationError {
    pub fn details(&self) -> &RunDetails {
        match self {
            VerificationError::Spawn { details, .. }
            | VerificationError::NonZeroExit { details }
            | VerificationError::NonEmptyStderr { details }
            | VerificationError::MalformedOutput { details, .. }
            | VerificationError::NoTestsExecuted { details }
            | VerificationError::NoPassedTests { details }
            | VerificationError::ExcessiveTests { details, .. }
            | VerificationError::FailedTests { details, .. } => details,
        }
    }
}

struct TestNames<'a>(&'a BTreeSet<String>);

impl fmt::Display for TestNames<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("]")
    }
}

/// Why a single test-data file did not pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TestError {
    #[error("No test binary for test file {}", .0.display())]
    UnknownTestDataFile(PathBuf),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl TestError {
    pub fn is_compilation(&self) -> bool {
        matches!(self, TestError::Compilation(_))
    }
}
