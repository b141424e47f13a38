//! The `run` command: compile and run every test-data file, report results.

use bbtest::{TestEnvironment, TestOutcome, TestRunner, TestSummary};

use super::{discover, display_path, CliOptions};

/// Run all selected test-data files and exit with the summary's code.
pub fn run_tests(options: &CliOptions) {
    let (env, provider) = discover(options);

    println!(
        "Testing {} (target {})",
        env.tests_root().display(),
        env.target()
    );

    let runner = TestRunner::with_config(provider, options.runner.clone());
    let summary = runner.run();

    print_test_summary(&env, &summary, options.runner.verbose);

    std::process::exit(summary.exit_code());
}

/// Print a summary of test results, with optional verbose output.
fn print_test_summary(env: &TestEnvironment, summary: &TestSummary, verbose: bool) {
    for result in &summary.results {
        let path = display_path(env, &result.test_data_file);
        match &result.outcome {
            TestOutcome::Passed { ok_tests } => {
                if verbose {
                    println!(
                        "  PASS: {path} ({} tests, {:.2?})",
                        ok_tests.len(),
                        result.duration
                    );
                }
            }
            TestOutcome::Failed(err) => {
                println!("\n  FAIL: {path}");
                for line in err.to_string().lines() {
                    println!("    {line}");
                }
            }
        }
    }

    println!();
    println!("Test Summary:");
    println!(
        "  {} passed, {} failed ({} total)",
        summary.passed,
        summary.failed,
        summary.total()
    );
    if summary.compile_failures > 0 {
        println!("  {} failed to compile", summary.compile_failures);
    }
    println!("  Completed in {:.2?}", summary.duration);

    println!();
    if summary.has_failures() {
        println!("FAILED");
    } else if summary.total() == 0 {
        println!("NO TESTS FOUND");
    } else {
        println!("OK");
    }
}
