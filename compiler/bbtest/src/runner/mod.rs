//! Running a test binary and verifying what it reports.

use std::collections::BTreeSet;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, Instant};

use crate::{RunDetails, TestBinary, VerificationError};

mod output;

pub use output::{parse_status_lines, MalformedLine, StatusTable, RUN_LINE_PREFIX, STATUS_OK};

/// Which tests of a binary to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunParameters {
    /// All of them.
    Empty,
    /// Only tests whose qualified name starts with this prefix: a package
    /// name followed by a dot, so `box.a.` never admits `box.ab.*`.
    PackageScope(String),
}

impl RunParameters {
    /// Scope to the tests declared directly in `package` or its subpackages.
    pub fn package_scope(package: &str) -> Self {
        RunParameters::PackageScope(format!("{package}."))
    }
}

/// One test-data file's tests, ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackBoxTest {
    pub binary: TestBinary,
    pub run_parameters: RunParameters,
}

/// A verified run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub ok_tests: BTreeSet<String>,
    pub duration: Duration,
}

impl BlackBoxTest {
    pub fn new(binary: TestBinary, run_parameters: RunParameters) -> Self {
        BlackBoxTest {
            binary,
            run_parameters,
        }
    }

    /// The full command line, program first.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.binary.executable_file.to_string_lossy().into_owned()];
        if let RunParameters::PackageScope(prefix) = &self.run_parameters {
            args.push(format!("--ktest_filter={prefix}*"));
        }
        args.push("--ktest_logger=GTEST".to_string());
        args
    }

    /// Run the binary from its own directory, wait for it, and verify its output.
    pub fn run_and_verify(&self) -> Result<RunReport, VerificationError> {
        let start = Instant::now();
        let args = self.args();
        let output = self.run(&args)?;
        let ok_tests = output.verify(&self.run_parameters)?;
        Ok(RunReport {
            ok_tests,
            duration: start.elapsed(),
        })
    }

    fn run(&self, args: &[String]) -> Result<RunOutput, VerificationError> {
        let executable = &self.binary.executable_file;
        tracing::debug!(executable = %executable.display(), args = ?&args[1..], "running test binary");

        let mut command = Command::new(executable);
        command.args(&args[1..]);
        if let Some(dir) = executable.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| VerificationError::Spawn {
            message: e.to_string(),
            details: RunDetails {
                args: args.to_vec(),
                ..RunDetails::default()
            },
        })?;

        Ok(RunOutput {
            args: args.to_vec(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    pub fn executable(&self) -> &Path {
        &self.binary.executable_file
    }
}

/// Captured result of one run, stdout and stderr already trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutput {
    pub args: Vec<String>,
    /// `None` if killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    fn details(&self) -> RunDetails {
        RunDetails {
            args: self.args.clone(),
            exit_code: self.exit_code,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }

    /// Check the run against the status protocol. Returns the passing tests.
    ///
    /// Every check is fatal: the process must exit with 0 and print nothing
    /// to stderr; at least one test must have run and passed; under a package
    /// scope no passing test may lie outside the package; no test may have a
    /// status other than `OK`.
    pub fn verify(&self, run_parameters: &RunParameters) -> Result<BTreeSet<String>, VerificationError> {
        let result = self.check(run_parameters);
        if let Err(err) = &result {
            tracing::warn!(
                args = ?self.args,
                exit_code = ?self.exit_code,
                reason = %first_line(err),
                "verification failed"
            );
        }
        result
    }

    fn check(&self, run_parameters: &RunParameters) -> Result<BTreeSet<String>, VerificationError> {
        if self.exit_code != Some(0) {
            return Err(VerificationError::NonZeroExit {
                details: self.details(),
            });
        }
        if !self.stderr.is_empty() {
            return Err(VerificationError::NonEmptyStderr {
                details: self.details(),
            });
        }

        let mut table = parse_status_lines(&self.stdout).map_err(|malformed| {
            VerificationError::MalformedOutput {
                line: malformed.line,
                line_number: malformed.line_number,
                details: self.details(),
            }
        })?;

        if table.is_empty() {
            return Err(VerificationError::NoTestsExecuted {
                details: self.details(),
            });
        }

        let ok_tests = table.remove(STATUS_OK).unwrap_or_default();
        if ok_tests.is_empty() {
            return Err(VerificationError::NoPassedTests {
                details: self.details(),
            });
        }

        if let RunParameters::PackageScope(prefix) = run_parameters {
            let excessive: BTreeSet<String> = ok_tests
                .iter()
                .filter(|name| !name.starts_with(prefix.as_str()))
                .cloned()
                .collect();
            if !excessive.is_empty() {
                return Err(VerificationError::ExcessiveTests {
                    tests: excessive,
                    details: self.details(),
                });
            }
        }

        let count = table.values().map(BTreeSet::len).sum::<usize>();
        if count > 0 {
            let tests = table.into_values().flatten().collect();
            return Err(VerificationError::FailedTests {
                count,
                tests,
                details: self.details(),
            });
        }

        Ok(ok_tests)
    }
}

fn first_line(err: &VerificationError) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
