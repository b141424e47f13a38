//! Test cases: what gets compiled together and how each test-data file is run.
//!
//! A test-data file becomes either a [`StandaloneCase`] (its own binary, all
//! tests run) or a [`RegularCase`] (its sources live in a package derived from
//! its path). Regular cases sharing the same free compiler arguments are then
//! batched into one [`CompositeCase`] so they compile into a single binary;
//! each member is run with its own package as the test filter.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

mod create;
mod package;

pub use create::create_simple_test_case;
pub(crate) use package::fix_package_declaration;

/// Order-independent set of extra compiler arguments.
pub type FreeCompilerArgs = BTreeSet<String>;

/// Dotted package name, e.g. `codegen.box.simple`.
pub type PackageName = String;

/// A generated source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestFile {
    pub name: String,
    /// Where the file is written before compilation.
    pub location: PathBuf,
    pub contents: String,
}

/// A test-data file marked `STANDALONE`: compiled alone, sources untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandaloneCase {
    pub files: Vec<TestFile>,
    pub free_compiler_args: FreeCompilerArgs,
    pub test_data_file: PathBuf,
}

/// A test-data file whose sources were moved into `package_name`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegularCase {
    pub files: Vec<TestFile>,
    pub free_compiler_args: FreeCompilerArgs,
    pub test_data_file: PathBuf,
    pub package_name: PackageName,
}

/// Regular cases with identical free compiler arguments, compiled together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeCase {
    pub files: Vec<TestFile>,
    pub free_compiler_args: FreeCompilerArgs,
    pub test_data_file_to_package: BTreeMap<PathBuf, PackageName>,
}

impl CompositeCase {
    /// Batch `members`. All of them must share `free_compiler_args`.
    pub fn new(free_compiler_args: FreeCompilerArgs, members: Vec<RegularCase>) -> Self {
        debug_assert!(
            members
                .iter()
                .all(|m| m.free_compiler_args == free_compiler_args),
            "composite members must share free compiler args"
        );

        let mut files = Vec::new();
        let mut test_data_file_to_package = BTreeMap::new();
        for member in members {
            files.extend(member.files);
            test_data_file_to_package.insert(member.test_data_file, member.package_name);
        }

        CompositeCase {
            files,
            free_compiler_args,
            test_data_file_to_package,
        }
    }

    pub fn package_for(&self, test_data_file: &Path) -> Option<&str> {
        self.test_data_file_to_package
            .get(test_data_file)
            .map(String::as_str)
    }

    pub fn test_data_files(&self) -> impl Iterator<Item = &Path> {
        self.test_data_file_to_package.keys().map(PathBuf::as_path)
    }
}

/// Something that compiles into one binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TestCase {
    Standalone(StandaloneCase),
    Regular(RegularCase),
    Composite(CompositeCase),
}

impl TestCase {
    pub fn files(&self) -> &[TestFile] {
        match self {
            TestCase::Standalone(case) => &case.files,
            TestCase::Regular(case) => &case.files,
            TestCase::Composite(case) => &case.files,
        }
    }

    pub fn free_compiler_args(&self) -> &FreeCompilerArgs {
        match self {
            TestCase::Standalone(case) => &case.free_compiler_args,
            TestCase::Regular(case) => &case.free_compiler_args,
            TestCase::Composite(case) => &case.free_compiler_args,
        }
    }

    /// The test-data files this case was built from, in path order.
    pub fn test_data_files(&self) -> Vec<&Path> {
        match self {
            TestCase::Standalone(case) => vec![case.test_data_file.as_path()],
            TestCase::Regular(case) => vec![case.test_data_file.as_path()],
            TestCase::Composite(case) => case.test_data_files().collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TestCase::Standalone(_) => "standalone",
            TestCase::Regular(_) => "regular",
            TestCase::Composite(_) => "composite",
        }
    }
}

/// The classification of a single test-data file, before batching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimpleTestCase {
    Standalone(StandaloneCase),
    Regular(RegularCase),
}

impl SimpleTestCase {
    pub fn files(&self) -> &[TestFile] {
        match self {
            SimpleTestCase::Standalone(case) => &case.files,
            SimpleTestCase::Regular(case) => &case.files,
        }
    }

    pub fn test_data_file(&self) -> &Path {
        match self {
            SimpleTestCase::Standalone(case) => &case.test_data_file,
            SimpleTestCase::Regular(case) => &case.test_data_file,
        }
    }
}

impl From<SimpleTestCase> for TestCase {
    fn from(case: SimpleTestCase) -> Self {
        match case {
            SimpleTestCase::Standalone(case) => TestCase::Standalone(case),
            SimpleTestCase::Regular(case) => TestCase::Regular(case),
        }
    }
}
