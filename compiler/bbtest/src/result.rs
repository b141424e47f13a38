//! Test result types.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::TestError;

/// Outcome of one test-data file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestOutcome {
    /// Every test in its scope ran and passed.
    Passed { ok_tests: BTreeSet<String> },
    Failed(TestError),
}

impl TestOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TestOutcome::Failed(_))
    }

    /// Failed because its binary could not be built.
    pub fn is_compile_failure(&self) -> bool {
        matches!(self, TestOutcome::Failed(err) if err.is_compilation())
    }
}

/// Result of one test-data file.
#[derive(Clone, Debug)]
pub struct TestResult {
    pub test_data_file: PathBuf,
    pub outcome: TestOutcome,
    /// Includes compilation when this file triggered it.
    pub duration: Duration,
}

impl TestResult {
    pub fn passed(test_data_file: PathBuf, ok_tests: BTreeSet<String>, duration: Duration) -> Self {
        TestResult {
            test_data_file,
            outcome: TestOutcome::Passed { ok_tests },
            duration,
        }
    }

    #[cold]
    pub fn failed(test_data_file: PathBuf, error: TestError, duration: Duration) -> Self {
        TestResult {
            test_data_file,
            outcome: TestOutcome::Failed(error),
            duration,
        }
    }
}

/// Overall summary of a session.
#[derive(Clone, Debug, Default)]
pub struct TestSummary {
    /// Results in test-data file order.
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    /// Failures caused by compilation (also counted in `failed`).
    pub compile_failures: usize,
    /// Wall time of the session.
    pub duration: Duration,
}

impl TestSummary {
    pub fn new() -> Self {
        TestSummary::default()
    }

    pub fn add_result(&mut self, result: TestResult) {
        match &result.outcome {
            TestOutcome::Passed { .. } => self.passed += 1,
            TestOutcome::Failed(err) => {
                self.failed += 1;
                if err.is_compilation() {
                    self.compile_failures += 1;
                }
            }
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.outcome.is_failed())
    }

    /// Get exit code: 0 = all pass, 1 = failures, 2 = no test-data files found.
    pub fn exit_code(&self) -> i32 {
        if self.total() == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}
