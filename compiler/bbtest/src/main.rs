//! `bbtest`: compile and run black-box tests for the native code generator.

mod commands;

use bbtest::tracing_setup::init_tracing;
use commands::{list_cases, parse_options, run_tests};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "run" | "cases" => {
            let options = match parse_options(&args[2..]) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!();
                    print_usage();
                    std::process::exit(1);
                }
            };
            if command == "run" {
                run_tests(&options);
            } else {
                list_cases(&options);
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" => {
            println!("bbtest {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("bbtest: black-box tests for the native code generator");
    println!();
    println!("Usage: bbtest <command> [tests-root] [options]");
    println!();
    println!("Commands:");
    println!("  run [root]          Discover, compile and run all test-data files");
    println!("  cases [root]        Show how test-data files are grouped (no compilation)");
    println!("  help                Show this help message");
    println!("  version             Show version information");
    println!();
    println!("Options:");
    println!("  --filter=<text>     Only run test-data files whose path contains <text>");
    println!("  --verbose, -v       Also report passing files");
    println!("  --no-parallel       Run test-data files sequentially");
    println!("  --target=<name>     Compilation target (default: host), e.g. linux_x64");
    println!("  --home=<dir>        Compiler distribution (libraries in <dir>/klib)");
    println!("  --compiler=<path>   Compiler executable (default: <home>/bin/kotlinc-native)");
    println!("  --output=<dir>      Where generated sources and binaries go");
    println!();
    println!("Environment:");
    println!("  BBTEST_TESTS_ROOT, BBTEST_OUTPUT_DIR, BBTEST_TARGET, BBTEST_HOME, BBTEST_COMPILER");
    println!("  RUST_LOG=bbtest=debug     Enable logging (BBTEST_LOG_TREE=1 for a span tree)");
    println!();
    println!("Exit codes: 0 all passed, 1 failures, 2 no test-data files found");
}
