//! Command-line options shared by `run` and `cases`.

use std::path::PathBuf;

use bbtest::{ConfigError, TestEnvironment, TestRunnerConfig};

/// Bad command line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CliError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),
    #[error("unexpected argument '{0}' (tests root already given)")]
    UnexpectedArgument(String),
    #[error("option '{0}' needs a value")]
    MissingValue(String),
}

/// Parsed options; unset fields fall back to the environment.
#[derive(Clone, Debug, Default)]
pub struct CliOptions {
    pub tests_root: Option<PathBuf>,
    pub runner: TestRunnerConfig,
    pub target: Option<String>,
    pub home: Option<PathBuf>,
    pub compiler: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl CliOptions {
    /// Environment variables first, then command-line overrides.
    pub fn environment(&self) -> Result<TestEnvironment, ConfigError> {
        let mut env = TestEnvironment::from_env()?;
        if let Some(root) = &self.tests_root {
            env = env.with_tests_root(root);
        }
        if let Some(output) = &self.output {
            env = env.with_output_dir(output);
        }
        if let Some(target) = &self.target {
            env = env.with_target_name(target)?;
        }
        if let Some(home) = &self.home {
            env = env.with_home(home);
        }
        if let Some(compiler) = &self.compiler {
            env = env.with_compiler(compiler);
        }
        Ok(env)
    }
}

/// Parse everything after the command name. Flags and the optional tests
/// root may come in any order.
pub fn parse_options(args: &[String]) -> Result<CliOptions, CliError> {
    let mut options = CliOptions::default();

    for arg in args {
        if let Some(filter) = arg.strip_prefix("--filter=") {
            options.runner.filter = Some(filter.to_string());
        } else if arg == "--verbose" || arg == "-v" {
            options.runner.verbose = true;
        } else if arg == "--no-parallel" {
            options.runner.parallel = false;
        } else if let Some(target) = arg.strip_prefix("--target=") {
            options.target = Some(non_empty(arg, target)?.to_string());
        } else if let Some(home) = arg.strip_prefix("--home=") {
            options.home = Some(PathBuf::from(non_empty(arg, home)?));
        } else if let Some(compiler) = arg.strip_prefix("--compiler=") {
            options.compiler = Some(PathBuf::from(non_empty(arg, compiler)?));
        } else if let Some(output) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(non_empty(arg, output)?));
        } else if arg.starts_with('-') {
            return Err(CliError::UnknownOption(arg.clone()));
        } else if options.tests_root.is_none() {
            options.tests_root = Some(PathBuf::from(arg));
        } else {
            return Err(CliError::UnexpectedArgument(arg.clone()));
        }
    }

    Ok(options)
}

fn non_empty<'a>(arg: &str, value: &'a str) -> Result<&'a str, CliError> {
    if value.is_empty() {
        let name = arg.trim_end_matches('=');
        return Err(CliError::MissingValue(name.to_string()));
    }
    Ok(value)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
