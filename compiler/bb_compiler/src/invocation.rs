//! Argument vector for producing a test executable.

use std::path::{Path, PathBuf};

use crate::Target;

/// Everything the compiler needs to turn a set of sources into a test binary.
///
/// The fixed part of the vector asks for a program with the test runner
/// injected, assertions and debug info enabled. Free arguments come after the
/// fixed ones so a test can override them; sources come last.
#[derive(Clone, Debug)]
pub struct CompilerInvocation {
    target: Target,
    repository: PathBuf,
    output: PathBuf,
    free_args: Vec<String>,
    sources: Vec<PathBuf>,
}

impl CompilerInvocation {
    /// `repository` is the directory holding prebuilt dependency libraries.
    pub fn new(target: Target, repository: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        CompilerInvocation {
            target,
            repository: repository.into(),
            output: output.into(),
            free_args: Vec::new(),
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_free_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.free_args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_sources<I, P>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn into_args(self) -> Vec<String> {
        let mut args: Vec<String> = [
            "-produce",
            "program",
            "-generate-test-runner",
            "-enable-assertions",
            "-g",
            "-target",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        args.push(self.target.name().to_string());
        args.push("-repo".to_string());
        args.push(path_arg(&self.repository));
        args.push("-output".to_string());
        args.push(path_arg(&self.output));
        args.extend(self.free_args);
        args.extend(self.sources.iter().map(|source| path_arg(source)));
        args
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
