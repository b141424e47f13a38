//! Black-box test orchestrator for a native code generator.
//!
//! # Architecture
//!
//! ```text
//! tests root ──► discover_test_data_files()
//!     │
//!     ▼
//! create_simple_test_case()      split + classify one test-data file
//!     │                          (Standalone, or Regular with fixed packages)
//!     ▼
//! TestProvider::discover()       group Regular cases by compiler args into
//!     │                          Composite cases; file ─► case mapping
//!     ▼
//! CompiledTestCase::binary()     compile on first access, at most once
//!     │
//!     ▼
//! BlackBoxTest::run_and_verify() spawn, parse status lines, check invariants
//!     │
//!     ▼
//! TestRunner::run()              all files, in parallel, into a TestSummary
//! ```
//!
//! Discovery is a single synchronous pass and its result is immutable.
//! Compilation is lazy and memoized per case, so callers on many threads can
//! ask for tests of the same shared binary and the compiler still runs once.

pub mod case;
pub mod config;
pub mod discovery;
pub mod error;
pub mod provider;
pub mod result;
pub mod runner;
pub mod session;
pub mod tracing_setup;

pub use case::{
    create_simple_test_case, CompositeCase, FreeCompilerArgs, PackageName, RegularCase,
    SimpleTestCase, StandaloneCase, TestCase, TestFile,
};
pub use config::{ConfigError, TestEnvironment, TestRunnerConfig};
pub use discovery::discover_test_data_files;
pub use error::{DiscoveryError, RunDetails, TestError, VerificationError};
pub use provider::{stable_executable_file_name, CaseId, CompiledTestCase, TestBinary, TestProvider};
pub use result::{TestOutcome, TestResult, TestSummary};
pub use runner::{parse_status_lines, BlackBoxTest, RunOutput, RunParameters, RunReport, StatusTable};
pub use session::TestRunner;
