//! Command handlers for the `bbtest` CLI.

mod cases;
mod options;
mod run;

pub use cases::list_cases;
pub use options::{parse_options, CliOptions};
pub use run::run_tests;

use std::sync::Arc;

use bb_compiler::{Compiler, ExternalCompiler};
use bbtest::{TestEnvironment, TestProvider};

/// Discover test cases for `options`, or print why not and exit.
fn discover(options: &CliOptions) -> (TestEnvironment, TestProvider) {
    let env = match options.environment() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if !env.tests_root().exists() {
        eprintln!("Path not found: {}", env.tests_root().display());
        std::process::exit(1);
    }

    let compiler: Arc<dyn Compiler> = Arc::new(ExternalCompiler::new(env.compiler_program()));
    match TestProvider::discover(&env, compiler) {
        Ok(provider) => (env, provider),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Path relative to the tests root, for display.
fn display_path(env: &TestEnvironment, path: &std::path::Path) -> String {
    path.strip_prefix(env.tests_root())
        .unwrap_or(path)
        .display()
        .to_string()
}
