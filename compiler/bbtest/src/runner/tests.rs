use super::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn output(stdout: &str) -> RunOutput {
    RunOutput {
        args: vec!["/bin/t.kexe".to_string()],
        exit_code: Some(0),
        stdout: stdout.trim().to_string(),
        stderr: String::new(),
    }
}

fn scope(package: &str) -> RunParameters {
    RunParameters::package_scope(package)
}

fn names(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(ToString::to_string).collect()
}

#[test]
fn single_ok_test() {
    let stdout = "[ RUN      ] a.B\n[       OK ] a.B (1 ms)\n";

    let table = parse_status_lines(stdout).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table[STATUS_OK], names(&["a.B"]));

    assert_eq!(output(stdout).verify(&scope("a")).unwrap(), names(&["a.B"]));
    assert_eq!(output(stdout).verify(&RunParameters::Empty).unwrap(), names(&["a.B"]));
}

#[test]
fn malformed_status_line() {
    let stdout = "[ RUN      ] a.B\nunexpected line\n";

    let malformed = parse_status_lines(stdout).unwrap_err();
    assert_eq!(malformed.line_number, 2);
    assert_eq!(malformed.line, "unexpected line");

    let err = output(stdout).verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::MalformedOutput { line_number: 2, .. }));
}

#[test]
fn noise_between_pairs_is_ignored() {
    let stdout = "\
[==========] Running 2 tests from 1 test cases.
[----------] 2 tests from a
[ RUN      ] a.B
[       OK ] a.B (0 ms)
some program output
[ RUN      ] a.C
[       OK ] a.C (0 ms)
[==========] 2 tests from 1 test cases ran. (0 ms total)
[  PASSED  ] 2 tests.
";
    let table = parse_status_lines(stdout).unwrap();
    assert_eq!(table.keys().collect::<Vec<_>>(), vec![STATUS_OK]);
    assert_eq!(table[STATUS_OK], names(&["a.B", "a.C"]));
}

#[test]
fn name_under_two_statuses_is_kept_twice() {
    let stdout = "[ RUN      ] a.B\n[  FAILED  ] a.B (0 ms)\n[ RUN      ] a.B\n[       OK ] a.B (0 ms)\n";
    let table = parse_status_lines(stdout).unwrap();
    assert_eq!(table["FAILED"], names(&["a.B"]));
    assert_eq!(table[STATUS_OK], names(&["a.B"]));

    let err = output(stdout).verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::FailedTests { count: 1, .. }));
}

#[test]
fn excessive_tests_name_offenders() {
    let stdout = "\
[ RUN      ] a.B
[       OK ] a.B (0 ms)
[ RUN      ] b.C
[       OK ] b.C (0 ms)
[ RUN      ] c.D
[       OK ] c.D (0 ms)
";
    let err = output(stdout).verify(&scope("a")).unwrap_err();
    let VerificationError::ExcessiveTests { tests, .. } = err else {
        panic!("expected excessive tests, got {err:?}");
    };
    assert_eq!(tests, names(&["b.C", "c.D"]));
}

#[test]
fn package_scope_excludes_sibling_with_longer_name() {
    let stdout = "\
[ RUN      ] box.a.box
[       OK ] box.a.box (0 ms)
[ RUN      ] box.ab.box
[       OK ] box.ab.box (0 ms)
";
    let err = output(stdout).verify(&scope("box.a")).unwrap_err();
    let VerificationError::ExcessiveTests { tests, .. } = err else {
        panic!("expected excessive tests, got {err:?}");
    };
    assert_eq!(tests, names(&["box.ab.box"]));

    let ok_tests = output(stdout).verify(&scope("box")).unwrap();
    assert_eq!(ok_tests, names(&["box.a.box", "box.ab.box"]));
}

#[test]
fn failed_tests_are_counted() {
    let stdout = "\
[ RUN      ] a.B
[       OK ] a.B (0 ms)
[ RUN      ] a.C
[  FAILED  ] a.C (0 ms)
[ RUN      ] a.D
[  SKIPPED ] a.D (0 ms)
";
    let err = output(stdout).verify(&scope("a")).unwrap_err();
    let VerificationError::FailedTests { count, tests, .. } = &err else {
        panic!("expected failed tests, got {err:?}");
    };
    assert_eq!(*count, 2);
    assert_eq!(tests, &names(&["a.C", "a.D"]));
    assert!(err.to_string().contains("== BEGIN [STDOUT] =="));
}

#[test]
fn no_tests_executed() {
    let err = output("hello\n").verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::NoTestsExecuted { .. }));
}

#[test]
fn no_passed_tests() {
    let stdout = "[ RUN      ] a.B\n[  FAILED  ] a.B (0 ms)\n";
    let err = output(stdout).verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::NoPassedTests { .. }));
}

#[test]
fn non_zero_exit_comes_first() {
    let run = RunOutput {
        exit_code: Some(3),
        stderr: "boom".to_string(),
        ..output("garbage")
    };
    let err = run.verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::NonZeroExit { .. }));
    assert_eq!(err.details().stderr, "boom");
}

#[test]
fn killed_by_signal_is_non_zero() {
    let run = RunOutput {
        exit_code: None,
        ..output("[ RUN      ] a.B\n[       OK ] a.B (0 ms)")
    };
    let err = run.verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::NonZeroExit { .. }));
}

#[test]
fn stderr_is_fatal() {
    let run = RunOutput {
        stderr: "warning".to_string(),
        ..output("[ RUN      ] a.B\n[       OK ] a.B (0 ms)")
    };
    let err = run.verify(&RunParameters::Empty).unwrap_err();
    assert!(matches!(err, VerificationError::NonEmptyStderr { .. }));
}

#[test]
fn args_with_and_without_scope() {
    let binary = TestBinary {
        executable_file: PathBuf::from("/out/binaries/001-a-1f.kexe"),
    };

    let scoped = BlackBoxTest::new(binary.clone(), scope("codegen.box.a"));
    assert_eq!(
        scoped.args(),
        vec![
            "/out/binaries/001-a-1f.kexe".to_string(),
            "--ktest_filter=codegen.box.a.*".to_string(),
            "--ktest_logger=GTEST".to_string(),
        ]
    );

    let all = BlackBoxTest::new(binary, RunParameters::Empty);
    assert_eq!(all.args().len(), 2);
}

#[test]
fn missing_binary_is_spawn_error() {
    let test = BlackBoxTest::new(
        TestBinary {
            executable_file: PathBuf::from("/definitely/not/here.kexe"),
        },
        RunParameters::Empty,
    );
    let err = test.run_and_verify().unwrap_err();
    assert!(matches!(err, VerificationError::Spawn { .. }));
}

#[cfg(unix)]
#[test]
fn runs_in_binary_directory() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("t.kexe");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         test -f ./t.kexe || exit 7\n\
         echo \"[ RUN      ] a.B\"\n\
         echo \"[       OK ] a.B (0 ms)\"\n",
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let test = BlackBoxTest::new(
        TestBinary {
            executable_file: script,
        },
        scope("a"),
    );
    let report = test.run_and_verify().unwrap();
    assert_eq!(report.ok_tests, names(&["a.B"]));
}
