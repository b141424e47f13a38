//! The test provider: test-data file → compiled test case → runnable test.
//!
//! Discovery builds every case up front. Each [`CompiledTestCase`] compiles
//! lazily, the first time one of its tests is requested; concurrent requests
//! for the same case wait for that single compilation and then share its
//! outcome, success or failure.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use bb_compiler::{run_compiler, CompilationError, Compiler, CompilerInvocation};
use rustc_hash::FxHashMap;

use crate::case::{create_simple_test_case, CompositeCase, FreeCompilerArgs, RegularCase};
use crate::{
    discover_test_data_files, BlackBoxTest, DiscoveryError, RunParameters, SimpleTestCase,
    TestCase, TestEnvironment, TestError, TestFile,
};

mod naming;

pub use naming::stable_executable_file_name;

/// Index of a case within its provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaseId(pub usize);

/// A successfully compiled test executable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestBinary {
    pub executable_file: PathBuf,
}

/// A test case together with its (lazily produced) binary.
pub struct CompiledTestCase {
    id: CaseId,
    test_case: TestCase,
    executable: PathBuf,
    args: Vec<String>,
    compiler: Arc<dyn Compiler>,
    binary: OnceLock<Result<TestBinary, CompilationError>>,
}

impl CompiledTestCase {
    fn new(id: CaseId, test_case: TestCase, env: &TestEnvironment, compiler: Arc<dyn Compiler>) -> Self {
        let executable = env
            .test_binaries_dir()
            .join(stable_executable_file_name(&test_case, env.target()));

        let args = CompilerInvocation::new(
            env.target().clone(),
            env.dependency_repository(),
            executable.clone(),
        )
        .with_free_args(test_case.free_compiler_args().iter().cloned())
        .with_sources(test_case.files().iter().map(|file| file.location.clone()))
        .into_args();

        CompiledTestCase {
            id,
            test_case,
            executable,
            args,
            compiler,
            binary: OnceLock::new(),
        }
    }

    pub fn id(&self) -> CaseId {
        self.id
    }

    pub fn test_case(&self) -> &TestCase {
        &self.test_case
    }

    /// Where the binary is (or will be) written.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// The full compiler argument vector.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The binary, compiling it on first access.
    ///
    /// Blocks while another thread compiles this case. A failed compilation
    /// is remembered and returned again on every later call.
    pub fn binary(&self) -> Result<&TestBinary, CompilationError> {
        self.binary
            .get_or_init(|| self.compile())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Whether compilation has already happened (successfully or not).
    pub fn is_compiled(&self) -> bool {
        self.binary.get().is_some()
    }

    fn compile(&self) -> Result<TestBinary, CompilationError> {
        let start = Instant::now();
        tracing::info!(
            case = self.id.0,
            kind = self.test_case.kind(),
            files = self.test_case.files().len(),
            args = self.args.len(),
            executable = %self.executable.display(),
            "compiling test case"
        );

        match run_compiler(self.compiler.as_ref(), &self.args) {
            Ok(()) => {
                tracing::info!(case = self.id.0, elapsed = ?start.elapsed(), "compiled test case");
                Ok(TestBinary {
                    executable_file: self.executable.clone(),
                })
            }
            Err(err) => {
                tracing::warn!(case = self.id.0, elapsed = ?start.elapsed(), %err, "compilation failed");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for CompiledTestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTestCase")
            .field("id", &self.id)
            .field("test_case", &self.test_case)
            .field("executable", &self.executable)
            .field("compiled", &self.is_compiled())
            .finish_non_exhaustive()
    }
}

/// Every test case discovered under one tests root.
#[derive(Debug)]
pub struct TestProvider {
    cases: Vec<CompiledTestCase>,
    by_file: FxHashMap<PathBuf, CaseId>,
    discovery_errors: BTreeMap<PathBuf, DiscoveryError>,
}

impl TestProvider {
    /// Discover every test-data file under the tests root of `env`.
    pub fn discover(env: &TestEnvironment, compiler: Arc<dyn Compiler>) -> Result<Self, DiscoveryError> {
        let files = discover_test_data_files(env.tests_root());
        Self::from_test_data_files(env, compiler, files)
    }

    /// Build cases for `files`, write their generated sources, and batch the
    /// regular ones into composites.
    ///
    /// Fails only if the binaries directory cannot be created. A problem with
    /// one test-data file is recorded against that file and reported when its
    /// test is requested.
    pub fn from_test_data_files(
        env: &TestEnvironment,
        compiler: Arc<dyn Compiler>,
        files: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self, DiscoveryError> {
        let binaries_dir = env.test_binaries_dir();
        fs::create_dir_all(binaries_dir).map_err(|e| DiscoveryError::io(binaries_dir, &e))?;

        let mut provider = TestProvider {
            cases: Vec::new(),
            by_file: FxHashMap::default(),
            discovery_errors: BTreeMap::new(),
        };
        let mut regular_groups: BTreeMap<FreeCompilerArgs, Vec<RegularCase>> = BTreeMap::new();

        for file in files {
            let case = create_simple_test_case(&file, env)
                .and_then(|case| write_sources(case.files()).map(|()| case));
            match case {
                Ok(SimpleTestCase::Standalone(case)) => {
                    provider.add(TestCase::Standalone(case), env, &compiler);
                }
                Ok(SimpleTestCase::Regular(case)) => {
                    regular_groups
                        .entry(case.free_compiler_args.clone())
                        .or_default()
                        .push(case);
                }
                Err(err) => {
                    tracing::warn!(file = %file.display(), %err, "discovery failed");
                    provider.discovery_errors.insert(file, err);
                }
            }
        }

        for (args, mut members) in regular_groups {
            members.sort_by(|a, b| a.test_data_file.cmp(&b.test_data_file));
            provider.add(TestCase::Composite(CompositeCase::new(args, members)), env, &compiler);
        }

        tracing::info!(
            cases = provider.cases.len(),
            test_data_files = provider.by_file.len(),
            errors = provider.discovery_errors.len(),
            "discovered test cases"
        );
        Ok(provider)
    }

    fn add(&mut self, test_case: TestCase, env: &TestEnvironment, compiler: &Arc<dyn Compiler>) {
        let id = CaseId(self.cases.len());
        for file in test_case.test_data_files() {
            self.by_file.insert(file.to_path_buf(), id);
        }
        self.cases
            .push(CompiledTestCase::new(id, test_case, env, Arc::clone(compiler)));
    }

    /// The runnable test for `test_data_file`, compiling its case if needed.
    pub fn get_test(&self, test_data_file: &Path) -> Result<BlackBoxTest, TestError> {
        if let Some(err) = self.discovery_errors.get(test_data_file) {
            return Err(err.clone().into());
        }
        let compiled = self
            .case_for(test_data_file)
            .ok_or_else(|| TestError::UnknownTestDataFile(test_data_file.to_path_buf()))?;

        let binary = compiled.binary()?.clone();
        let run_parameters = match compiled.test_case() {
            TestCase::Standalone(_) => RunParameters::Empty,
            TestCase::Regular(case) => RunParameters::package_scope(&case.package_name),
            TestCase::Composite(case) => match case.package_for(test_data_file) {
                Some(package) => RunParameters::package_scope(package),
                None => return Err(TestError::UnknownTestDataFile(test_data_file.to_path_buf())),
            },
        };

        Ok(BlackBoxTest::new(binary, run_parameters))
    }

    pub fn case_for(&self, test_data_file: &Path) -> Option<&CompiledTestCase> {
        self.by_file
            .get(test_data_file)
            .and_then(|id| self.cases.get(id.0))
    }

    pub fn cases(&self) -> &[CompiledTestCase] {
        &self.cases
    }

    /// Every test-data file seen, including those that failed discovery, sorted.
    pub fn test_data_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .by_file
            .keys()
            .chain(self.discovery_errors.keys())
            .cloned()
            .collect();
        files.sort();
        files
    }

    pub fn discovery_errors(&self) -> &BTreeMap<PathBuf, DiscoveryError> {
        &self.discovery_errors
    }
}

fn write_sources(files: &[TestFile]) -> Result<(), DiscoveryError> {
    for file in files {
        if let Some(dir) = file.location.parent() {
            fs::create_dir_all(dir).map_err(|e| DiscoveryError::io(dir, &e))?;
        }
        fs::write(&file.location, &file.contents).map_err(|e| DiscoveryError::io(&file.location, &e))?;
    }
    Ok(())
}
