//! The `cases` command: show how test-data files were classified.

use bbtest::TestCase;

use super::{discover, display_path, CliOptions};

/// Print every case and discovery error without compiling anything.
pub fn list_cases(options: &CliOptions) {
    let (env, provider) = discover(options);

    for compiled in provider.cases() {
        let case = compiled.test_case();
        let executable = compiled
            .executable()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let args = case
            .free_compiler_args()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        println!("{} {executable} ({} files)", case.kind(), case.files().len());
        if !args.is_empty() {
            println!("  args: {args}");
        }
        match case {
            TestCase::Composite(composite) => {
                for (file, package) in &composite.test_data_file_to_package {
                    println!("  {} -> {package}", display_path(&env, file));
                }
            }
            TestCase::Regular(regular) => {
                println!(
                    "  {} -> {}",
                    display_path(&env, &regular.test_data_file),
                    regular.package_name
                );
            }
            TestCase::Standalone(standalone) => {
                println!("  {}", display_path(&env, &standalone.test_data_file));
            }
        }
    }

    for (file, err) in provider.discovery_errors() {
        println!("error {}", display_path(&env, file));
        println!("  {err}");
    }

    println!();
    println!(
        "{} cases, {} test-data files, {} errors",
        provider.cases().len(),
        provider.test_data_files().len(),
        provider.discovery_errors().len()
    );

    if provider.test_data_files().is_empty() {
        std::process::exit(2);
    }
    if !provider.discovery_errors().is_empty() {
        std::process::exit(1);
    }
}
