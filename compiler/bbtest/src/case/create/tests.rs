use super::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    env: TestEnvironment,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let env = TestEnvironment::new(dir.path().join("testData"), dir.path().join("out"));
        fs::create_dir_all(env.tests_root()).unwrap();
        Fixture { _dir: dir, env }
    }

    fn write(&self, relative: &str, text: &str) -> PathBuf {
        let path = self.env.tests_root().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, text).unwrap();
        path
    }
}

#[test]
fn package_name_from_path() {
    assert_eq!(derive_package_name(Path::new("codegen/box/simple")), "codegen.box.simple");
    assert_eq!(derive_package_name(Path::new("top")), "top");
}

#[test]
fn regular_case_gets_package() {
    let fixture = Fixture::new();
    let path = fixture.write("codegen/box/simple.kt", "fun box() = \"OK\"\n");

    let case = create_simple_test_case(&path, &fixture.env).unwrap();
    let SimpleTestCase::Regular(case) = case else {
        panic!("expected a regular case");
    };

    assert_eq!(case.package_name, "codegen.box.simple");
    assert_eq!(case.files.len(), 1);
    assert_eq!(case.files[0].name, "main.kt");
    assert_eq!(
        case.files[0].location,
        fixture.env.test_sources_dir().join("codegen/box/simple/main.kt")
    );
    assert_eq!(case.files[0].contents, "package codegen.box.simple fun box() = \"OK\"\n");
    assert!(case.free_compiler_args.is_empty());
}

#[test]
fn standalone_case_untouched() {
    let fixture = Fixture::new();
    let text = "// STANDALONE\n// FREE_COMPILER_ARGS: -Xb -Xa\n// FREE_COMPILER_ARGS: -Xa\nfun main() {}\n";
    let path = fixture.write("a/solo.kt", text);

    let case = create_simple_test_case(&path, &fixture.env).unwrap();
    let SimpleTestCase::Standalone(case) = case else {
        panic!("expected a standalone case");
    };

    assert_eq!(case.files[0].contents, "\n\n\nfun main() {}\n");
    assert_eq!(
        case.free_compiler_args.into_iter().collect::<Vec<_>>(),
        vec!["-Xa".to_string(), "-Xb".to_string()]
    );
}

#[test]
fn multi_file_case() {
    let fixture = Fixture::new();
    let text = "// FILE: lib.kt\nfun answer() = 42\n// FILE: main.kt\nfun box() = \"OK\"\n";
    let path = fixture.write("multi/two.kt", text);

    let case = create_simple_test_case(&path, &fixture.env).unwrap();
    let names: Vec<_> = case.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["lib.kt", "main.kt"]);
    assert!(case
        .files()
        .iter()
        .all(|f| f.contents.starts_with("package multi.two ")));
}

#[test]
fn package_mismatch_is_discovery_error() {
    let fixture = Fixture::new();
    let path = fixture.write("foo/baz.kt", "package foo.bar\n");

    let err = create_simple_test_case(&path, &fixture.env).unwrap_err();
    assert!(matches!(err, DiscoveryError::PackageMismatch { ref expected, .. } if expected == "foo.baz"));
}

#[test]
fn matching_package_compiles_unchanged() {
    let fixture = Fixture::new();
    let text = "package foo.baz\n\nfun box() = \"OK\"\n";
    let path = fixture.write("foo/baz.kt", text);

    let case = create_simple_test_case(&path, &fixture.env).unwrap();
    assert_eq!(case.files()[0].contents, text);
}

#[test]
fn validation_error_propagates() {
    let fixture = Fixture::new();
    let path = fixture.write("bad.kt", "// FILE: a.kt b.kt\n");

    let err = create_simple_test_case(&path, &fixture.env).unwrap_err();
    assert!(matches!(err, DiscoveryError::Validation(_)));
}

#[test]
fn outside_root_is_rejected() {
    let fixture = Fixture::new();
    let elsewhere = fixture._dir.path().join("elsewhere.kt");
    fs::write(&elsewhere, "fun box() = \"OK\"\n").unwrap();

    let err = create_simple_test_case(&elsewhere, &fixture.env).unwrap_err();
    assert!(matches!(err, DiscoveryError::OutsideTestsRoot { .. }));
}

#[test]
fn unreadable_file_is_io_error() {
    let fixture = Fixture::new();
    let missing = fixture.env.tests_root().join("missing.kt");

    let err = create_simple_test_case(&missing, &fixture.env).unwrap_err();
    assert!(matches!(err, DiscoveryError::Io { .. }));
}
