//! Discover, compile, run and verify a small test tree end to end.
//!
//! The compiler is an in-process fake that turns sources into shell scripts
//! speaking the run/status protocol, so this only runs on Unix.

#![cfg(unix)]
#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bb_compiler::{Compiler, CompilerOutput, ExitCode};
use bbtest::{
    DiscoveryError, TestEnvironment, TestError, TestOutcome, TestProvider, TestRunner,
    TestRunnerConfig, VerificationError,
};
use pretty_assertions::assert_eq;

/// Emits one `box` test per source file declaring `fun box()`.
///
/// A source containing `FAIL_ME` reports its test as failed; one containing
/// `COMPILE_ERROR` makes the whole compilation fail.
#[derive(Default)]
struct ScriptCompiler {
    calls: AtomicUsize,
}

impl ScriptCompiler {
    fn test_for(source: &str) -> Option<(String, &'static str)> {
        if !source.contains("fun box()") {
            return None;
        }
        let name = match source.split_whitespace().skip_while(|w| *w != "package").nth(1) {
            Some(package) => format!("{package}.box"),
            None => "box".to_string(),
        };
        let status = if source.contains("FAIL_ME") { "  FAILED" } else { "      OK" };
        Some((name, status))
    }
}

impl Compiler for ScriptCompiler {
    fn compile(&self, args: &[String]) -> io::Result<CompilerOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(args.iter().any(|a| a == "-generate-test-runner"));

        let output = args
            .iter()
            .position(|a| a == "-output")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .unwrap();

        let mut script = String::from(
            "#!/bin/sh\n\
             filter='*'\n\
             for arg in \"$@\"; do\n\
             \x20 case \"$arg\" in --ktest_filter=*) filter=\"${arg#--ktest_filter=}\" ;; esac\n\
             done\n\
             run() {\n\
             \x20 case \"$1\" in $filter) echo \"[ RUN      ] $1\"; echo \"[ $2 ] $1 (0 ms)\" ;; esac\n\
             }\n",
        );

        for source in args.iter().filter(|a| a.ends_with(".kt")) {
            let text = fs::read_to_string(source)?;
            if text.contains("COMPILE_ERROR") {
                return Ok(CompilerOutput::new(
                    ExitCode::CompilationError,
                    format!("error: {source}:1:1: unresolved reference: COMPILE_ERROR\n"),
                ));
            }
            if let Some((name, status)) = Self::test_for(&text) {
                script.push_str(&format!("run '{name}' '{status}'\n"));
            }
        }

        fs::write(&output, script)?;
        fs::set_permissions(&output, fs::Permissions::from_mode(0o755))?;
        Ok(CompilerOutput::new(ExitCode::Ok, "info: done\n"))
    }
}

fn write(root: &Path, relative: &str, text: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    path
}

fn outcome<'a>(summary: &'a bbtest::TestSummary, file: &Path) -> &'a TestOutcome {
    &summary
        .results
        .iter()
        .find(|r| r.test_data_file == file)
        .unwrap()
        .outcome
}

// One test: spawning scripts while another thread writes one can fail with
// ETXTBSY, so everything here runs sequentially on a single thread.
#[test]
fn full_session() {
    let dir = tempfile::tempdir().unwrap();
    let env = TestEnvironment::new(dir.path().join("testData"), dir.path().join("out"));
    let root = env.tests_root().to_path_buf();

    let a = write(&root, "box/a.kt", "fun box() = \"OK\"\n");
    let b = write(
        &root,
        "box/b.kt",
        "// FILE: lib.kt\nfun helper() = 1\n\n// FILE: main.kt\nfun box() = if (helper() == 1) \"OK\" else \"FAIL\"\n",
    );
    let failing = write(&root, "box/fail.kt", "fun box() = \"FAIL_ME\"\n");
    let opt = write(&root, "opt/c.kt", "// FREE_COMPILER_ARGS: -Xfoo\nfun box() = \"OK\"\n");
    let solo = write(&root, "solo/s.kt", "// STANDALONE\nfun box() = \"OK\"\n");
    let broken = write(
        &root,
        "broken/x.kt",
        "// FREE_COMPILER_ARGS: -Xbroken\nfun box() = COMPILE_ERROR\n",
    );
    let mismatch = write(&root, "bad/p.kt", "package wrong.name\n\nfun box() = \"OK\"\n");

    let compiler = Arc::new(ScriptCompiler::default());
    let dyn_compiler: Arc<dyn Compiler> = compiler.clone();
    let provider = TestProvider::discover(&env, dyn_compiler).unwrap();

    // box/{a,b,fail} share a binary; opt, broken and solo get their own.
    assert_eq!(provider.cases().len(), 4);
    assert_eq!(
        provider.case_for(&a).unwrap().id(),
        provider.case_for(&failing).unwrap().id()
    );
    assert_eq!(provider.discovery_errors().len(), 1);

    let runner = TestRunner::with_config(
        provider,
        TestRunnerConfig {
            parallel: false,
            ..TestRunnerConfig::default()
        },
    );
    let summary = runner.run();

    assert_eq!(summary.total(), 7);
    assert_eq!(summary.passed, 4);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.compile_failures, 1);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 4);

    let TestOutcome::Passed { ok_tests } = outcome(&summary, &a) else {
        panic!("box/a.kt should pass");
    };
    assert_eq!(ok_tests.iter().collect::<Vec<_>>(), vec!["box.a.box"]);
    assert!(outcome(&summary, &b).is_passed());
    assert!(outcome(&summary, &opt).is_passed());

    let TestOutcome::Passed { ok_tests } = outcome(&summary, &solo) else {
        panic!("solo/s.kt should pass");
    };
    assert_eq!(ok_tests.iter().collect::<Vec<_>>(), vec!["box"]);

    assert!(matches!(
        outcome(&summary, &failing),
        TestOutcome::Failed(TestError::Verification(VerificationError::NoPassedTests { .. }))
    ));
    assert!(outcome(&summary, &broken).is_compile_failure());
    assert!(matches!(
        outcome(&summary, &mismatch),
        TestOutcome::Failed(TestError::Discovery(DiscoveryError::PackageMismatch { .. }))
    ));

    // Generated sources keep line numbers.
    let main = fs::read_to_string(env.test_sources_dir().join("box/b/main.kt")).unwrap();
    assert_eq!(main.lines().nth(4), Some("fun box() = if (helper() == 1) \"OK\" else \"FAIL\""));
    assert!(main.starts_with("package box.b "));
}
