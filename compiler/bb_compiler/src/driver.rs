//! Invoking the compiler and judging its outcome.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::message::{parse_messages, render_plain, CompilerMessage};
use crate::{CompilationError, CompilerDetails};

/// Process exit code of the compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitCode {
    Ok,
    CompilationError,
    InternalError,
    ScriptExecutionError,
    /// Any code outside the known set, kept verbatim.
    Other(i32),
}

impl ExitCode {
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => ExitCode::Ok,
            1 => ExitCode::CompilationError,
            2 => ExitCode::InternalError,
            3 => ExitCode::ScriptExecutionError,
            other => ExitCode::Other(other),
        }
    }

    pub const fn code(self) -> i32 {
        match self {
            ExitCode::Ok => 0,
            ExitCode::CompilationError => 1,
            ExitCode::InternalError => 2,
            ExitCode::ScriptExecutionError => 3,
            ExitCode::Other(code) => code,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Ok => f.write_str("OK"),
            ExitCode::CompilationError => f.write_str("COMPILATION_ERROR"),
            ExitCode::InternalError => f.write_str("INTERNAL_ERROR"),
            ExitCode::ScriptExecutionError => f.write_str("SCRIPT_EXECUTION_ERROR"),
            ExitCode::Other(code) => write!(f, "{code}"),
        }
    }
}

/// What one compiler run reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerOutput {
    pub exit_code: ExitCode,
    pub messages: Vec<CompilerMessage>,
    /// The diagnostic stream as emitted.
    pub raw: String,
}

impl CompilerOutput {
    /// Build from the raw diagnostic stream.
    pub fn new(exit_code: ExitCode, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        CompilerOutput {
            exit_code,
            messages: parse_messages(&raw),
            raw,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity.is_error())
    }
}

/// The compiler under test.
///
/// `compile` returns `Err` only when the compiler could not be run at all;
/// a run that rejects the sources is an `Ok` output with a failing exit code
/// or error messages.
pub trait Compiler: Send + Sync {
    fn compile(&self, args: &[String]) -> io::Result<CompilerOutput>;
}

/// Runs a compiler executable and reads its stdout and stderr as the
/// diagnostic stream.
#[derive(Clone, Debug)]
pub struct ExternalCompiler {
    program: PathBuf,
}

impl ExternalCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ExternalCompiler {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Compiler for ExternalCompiler {
    fn compile(&self, args: &[String]) -> io::Result<CompilerOutput> {
        tracing::debug!(program = %self.program.display(), args = args.len(), "spawning compiler");
        let output = Command::new(&self.program).args(args).output()?;

        let mut raw = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !raw.is_empty() && !raw.ends_with('\n') {
                raw.push('\n');
            }
            raw.push_str(&stderr);
        }

        // Killed by a signal: there is no code to report.
        let exit_code = output
            .status
            .code()
            .map_or(ExitCode::InternalError, ExitCode::from_code);

        Ok(CompilerOutput::new(exit_code, raw))
    }
}

/// Run `compiler` with `args` and require a clean result.
///
/// Success means exit code [`ExitCode::Ok`] and no error-severity messages.
pub fn run_compiler(compiler: &dyn Compiler, args: &[String]) -> Result<(), CompilationError> {
    let start = Instant::now();
    let output = compiler
        .compile(args)
        .map_err(|e| CompilationError::Launch {
            args: args.to_vec(),
            message: e.to_string(),
        })?;
    tracing::debug!(
        exit_code = %output.exit_code,
        messages = output.messages.len(),
        elapsed = ?start.elapsed(),
        "compiler finished"
    );

    let details = || CompilerDetails {
        args: args.to_vec(),
        exit_code: output.exit_code,
        raw_output: output.raw.clone(),
        rendered: render_plain(&output.messages),
    };

    if output.exit_code != ExitCode::Ok {
        return Err(CompilationError::NonZeroExit(details()));
    }
    if output.has_errors() {
        return Err(CompilationError::Errors(details()));
    }
    Ok(())
}
