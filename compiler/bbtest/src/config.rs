//! Configuration: where test data lives, where output goes, what to compile for.
//!
//! Defaults can be overridden from the environment:
//!
//! | Variable             | Meaning                                   | Default              |
//! |----------------------|-------------------------------------------|----------------------|
//! | `BBTEST_TESTS_ROOT`  | root of the test-data tree                | `testData`           |
//! | `BBTEST_OUTPUT_DIR`  | holds `sources/` and `binaries/`          | `build/bbtest`       |
//! | `BBTEST_TARGET`      | compilation target name                   | host target          |
//! | `BBTEST_HOME`        | compiler distribution (libraries in `klib/`) | `dist`            |
//! | `BBTEST_COMPILER`    | compiler executable                       | `<home>/bin/kotlinc-native` |

use std::path::{Path, PathBuf};

use bb_compiler::Target;

pub const TESTS_ROOT_VAR: &str = "BBTEST_TESTS_ROOT";
pub const OUTPUT_DIR_VAR: &str = "BBTEST_OUTPUT_DIR";
pub const TARGET_VAR: &str = "BBTEST_TARGET";
pub const HOME_VAR: &str = "BBTEST_HOME";
pub const COMPILER_VAR: &str = "BBTEST_COMPILER";

/// Invalid configuration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown target '{0}' (expected e.g. linux_x64, macos_arm64, mingw_x64)")]
    UnknownTarget(String),
}

/// Paths and target shared by discovery, compilation and execution.
///
/// All paths are made absolute on construction: generated sources are passed
/// to the compiler by absolute path, and test binaries are started from their
/// own directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEnvironment {
    tests_root: PathBuf,
    test_sources_dir: PathBuf,
    test_binaries_dir: PathBuf,
    target: Target,
    home: PathBuf,
    compiler: Option<PathBuf>,
}

impl TestEnvironment {
    /// Test data under `tests_root`; generated sources and binaries under `output_dir`.
    pub fn new(tests_root: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Self {
        let output_dir = absolute(output_dir.as_ref());
        TestEnvironment {
            tests_root: absolute(tests_root.as_ref()),
            test_sources_dir: output_dir.join("sources"),
            test_binaries_dir: output_dir.join("binaries"),
            target: Target::host(),
            home: absolute(Path::new("dist")),
            compiler: None,
        }
    }

    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let tests_root = lookup(TESTS_ROOT_VAR).unwrap_or_else(|| "testData".to_string());
        let output_dir = lookup(OUTPUT_DIR_VAR).unwrap_or_else(|| "build/bbtest".to_string());
        let mut env = TestEnvironment::new(tests_root, output_dir);

        if let Some(target) = lookup(TARGET_VAR) {
            env = env.with_target_name(&target)?;
        }
        if let Some(home) = lookup(HOME_VAR) {
            env = env.with_home(home);
        }
        if let Some(compiler) = lookup(COMPILER_VAR) {
            env = env.with_compiler(compiler);
        }
        Ok(env)
    }

    #[must_use]
    pub fn with_tests_root(mut self, tests_root: impl AsRef<Path>) -> Self {
        self.tests_root = absolute(tests_root.as_ref());
        self
    }

    /// Move both generated sources and binaries under `output_dir`.
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl AsRef<Path>) -> Self {
        let output_dir = absolute(output_dir.as_ref());
        self.test_sources_dir = output_dir.join("sources");
        self.test_binaries_dir = output_dir.join("binaries");
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_target_name(self, name: &str) -> Result<Self, ConfigError> {
        let target = Target::parse(name).ok_or_else(|| ConfigError::UnknownTarget(name.to_string()))?;
        Ok(self.with_target(target))
    }

    #[must_use]
    pub fn with_home(mut self, home: impl AsRef<Path>) -> Self {
        self.home = absolute(home.as_ref());
        self
    }

    #[must_use]
    pub fn with_compiler(mut self, compiler: impl AsRef<Path>) -> Self {
        self.compiler = Some(absolute(compiler.as_ref()));
        self
    }

    pub fn tests_root(&self) -> &Path {
        &self.tests_root
    }

    pub fn test_sources_dir(&self) -> &Path {
        &self.test_sources_dir
    }

    pub fn test_binaries_dir(&self) -> &Path {
        &self.test_binaries_dir
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Prebuilt libraries passed to the compiler as `-repo`.
    pub fn dependency_repository(&self) -> PathBuf {
        self.home.join("klib")
    }

    /// The compiler executable: explicitly configured, or the one in `home`.
    pub fn compiler_program(&self) -> PathBuf {
        self.compiler
            .clone()
            .unwrap_or_else(|| self.home.join("bin").join(compiler_file_name()))
    }
}

fn compiler_file_name() -> &'static str {
    if cfg!(windows) {
        "kotlinc-native.bat"
    } else {
        "kotlinc-native"
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct TestRunnerConfig {
    /// Only run test-data files whose path contains this substring.
    pub filter: Option<String>,
    /// Report passing files too.
    pub verbose: bool,
    /// Run test-data files in parallel.
    pub parallel: bool,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        TestRunnerConfig {
            filter: None,
            verbose: false,
            parallel: true,
        }
    }
}

impl TestRunnerConfig {
    /// Whether `test_data_file` passes the filter.
    pub fn matches(&self, test_data_file: &Path) -> bool {
        match &self.filter {
            Some(filter) => test_data_file.to_string_lossy().contains(filter.as_str()),
            None => true,
        }
    }
}
