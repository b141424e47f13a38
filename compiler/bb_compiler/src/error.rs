//! Compilation failures.

use std::fmt;

use crate::ExitCode;

/// What the compiler was asked to do and what it said.
///
/// Both renderings of the diagnostics are kept: `raw_output` is the stream
/// exactly as the compiler emitted it, `rendered` is the grouped
/// human-readable form shown in failure reports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerDetails {
    pub args: Vec<String>,
    pub exit_code: ExitCode,
    pub raw_output: String,
    pub rendered: String,
}

impl fmt::Display for CompilerDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n\nCompiler arguments: {}", self.args.join(" "))?;
        writeln!(f, "Exit code: {}", self.exit_code)?;
        writeln!(f, "\n== BEGIN[COMPILER_OUTPUT] ==")?;
        let rendered = self.rendered.trim();
        if !rendered.is_empty() {
            writeln!(f, "{rendered}")?;
        }
        write!(f, "== END[COMPILER_OUTPUT] ==")
    }
}

/// The compiler did not produce a usable binary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompilationError {
    #[error("Compilation finished with non-zero exit code.{0}")]
    NonZeroExit(CompilerDetails),
    /// Exit code was OK but error diagnostics were reported.
    #[error("Compilation finished with errors.{0}")]
    Errors(CompilerDetails),
    #[error("Failed to launch the compiler: {message}\n\nCompiler arguments: {}", .args.join(" "))]
    Launch { args: Vec<String>, message: String },
}

impl CompilationError {
    /// Exit code reported by the compiler, if it ran at all.
    pub fn exit_code(&self) -> Option<ExitCode> {
        match self {
            CompilationError::NonZeroExit(details) | CompilationError::Errors(details) => {
                Some(details.exit_code)
            }
            CompilationError::Launch { .. } => None,
        }
    }

    pub fn details(&self) -> Option<&CompilerDetails> {
        match self {
            CompilationError::NonZeroExit(details) | CompilationError::Errors(details) => {
                Some(details)
            }
            CompilationError::Launch { .. } => None,
        }
    }
}
