//! Running every discovered test-data file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::{TestError, TestProvider, TestResult, TestRunnerConfig, TestSummary};

/// Runs the tests of a [`TestProvider`].
///
/// Files are independent: each one resolves its binary (compiling it if no
/// other file got there first) and runs it with its own run parameters.
pub struct TestRunner {
    provider: TestProvider,
    config: TestRunnerConfig,
}

impl TestRunner {
    pub fn new(provider: TestProvider) -> Self {
        TestRunner {
            provider,
            config: TestRunnerConfig::default(),
        }
    }

    pub fn with_config(provider: TestProvider, config: TestRunnerConfig) -> Self {
        TestRunner { provider, config }
    }

    pub fn provider(&self) -> &TestProvider {
        &self.provider
    }

    /// Test-data files selected by the filter, in path order.
    pub fn selected_files(&self) -> Vec<PathBuf> {
        self.provider
            .test_data_files()
            .into_iter()
            .filter(|file| self.config.matches(file))
            .collect()
    }

    /// Run all selected test-data files.
    pub fn run(&self) -> TestSummary {
        let files = self.selected_files();
        if self.config.parallel {
            self.run_parallel(&files)
        } else {
            self.run_sequential(&files)
        }
    }

    fn run_sequential(&self, files: &[PathBuf]) -> TestSummary {
        let start = Instant::now();
        let mut summary = TestSummary::new();
        for file in files {
            summary.add_result(self.run_file(file));
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Run files on a scoped rayon pool, torn down before returning.
    fn run_parallel(&self, files: &[PathBuf]) -> TestSummary {
        let start = Instant::now();

        let results = rayon::ThreadPoolBuilder::new()
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    files
                        .par_iter()
                        .map(|file| self.run_file(file))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                files.iter().map(|file| self.run_file(file)).collect()
            });

        let mut summary = TestSummary::new();
        for result in results {
            summary.add_result(result);
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Compile (if needed), run and verify one test-data file.
    pub fn run_file(&self, test_data_file: &Path) -> TestResult {
        let start = Instant::now();
        let outcome = self
            .provider
            .get_test(test_data_file)
            .and_then(|test| test.run_and_verify().map_err(TestError::from));

        match outcome {
            Ok(report) => {
                tracing::debug!(
                    file = %test_data_file.display(),
                    ok_tests = report.ok_tests.len(),
                    elapsed = ?report.duration,
                    "passed"
                );
                TestResult::passed(test_data_file.to_path_buf(), report.ok_tests, start.elapsed())
            }
            Err(err) => {
                tracing::debug!(file = %test_data_file.display(), "failed");
                TestResult::failed(test_data_file.to_path_buf(), err, start.elapsed())
            }
        }
    }
}
