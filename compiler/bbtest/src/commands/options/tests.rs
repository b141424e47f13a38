use super::*;
use pretty_assertions::assert_eq;

fn args(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

#[test]
fn defaults() {
    let options = parse_options(&[]).unwrap();
    assert_eq!(options.tests_root, None);
    assert!(options.runner.parallel);
    assert!(!options.runner.verbose);
    assert_eq!(options.runner.filter, None);
}

#[test]
fn flags_and_root_in_any_order() {
    let options = parse_options(&args(&[
        "--no-parallel",
        "testData/codegen",
        "-v",
        "--filter=box/",
        "--target=linux_arm64",
        "--home=/opt/native",
        "--compiler=/usr/bin/fakec",
        "--output=/tmp/bb",
    ]))
    .unwrap();

    assert_eq!(options.tests_root, Some(PathBuf::from("testData/codegen")));
    assert!(!options.runner.parallel);
    assert!(options.runner.verbose);
    assert_eq!(options.runner.filter.as_deref(), Some("box/"));
    assert_eq!(options.target.as_deref(), Some("linux_arm64"));
    assert_eq!(options.home, Some(PathBuf::from("/opt/native")));
    assert_eq!(options.compiler, Some(PathBuf::from("/usr/bin/fakec")));
    assert_eq!(options.output, Some(PathBuf::from("/tmp/bb")));
}

#[test]
fn unknown_option() {
    let err = parse_options(&args(&["--coverage"])).unwrap_err();
    assert_eq!(err, CliError::UnknownOption("--coverage".to_string()));
}

#[test]
fn second_root() {
    let err = parse_options(&args(&["a", "b"])).unwrap_err();
    assert_eq!(err, CliError::UnexpectedArgument("b".to_string()));
}

#[test]
fn empty_value() {
    let err = parse_options(&args(&["--target="])).unwrap_err();
    assert_eq!(err, CliError::MissingValue("--target".to_string()));
}

#[test]
fn overrides_reach_environment() {
    let options = parse_options(&args(&["/data/tests", "--output=/tmp/bb", "--target=wasm32"])).unwrap();
    let env = options.environment().unwrap();
    assert_eq!(env.tests_root(), std::path::Path::new("/data/tests"));
    assert_eq!(env.test_binaries_dir(), std::path::Path::new("/tmp/bb/binaries"));
    assert_eq!(env.target().exe_suffix(), "wasm");
}

#[test]
fn unknown_target_in_environment() {
    let options = parse_options(&args(&["--target=amiga"])).unwrap();
    assert!(matches!(options.environment(), Err(ConfigError::UnknownTarget(_))));
}
