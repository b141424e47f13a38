use super::*;

#[test]
fn parses_family_from_prefix() {
    assert_eq!(Target::parse("linux_x64").unwrap().family(), Family::Linux);
    assert_eq!(Target::parse("macos_arm64").unwrap().family(), Family::Osx);
    assert_eq!(Target::parse("ios_simulator_arm64").unwrap().family(), Family::Ios);
    assert_eq!(Target::parse("android_x86").unwrap().family(), Family::Android);
    assert_eq!(Target::parse("mingw_x64").unwrap().family(), Family::Mingw);
    assert_eq!(Target::parse("wasm32").unwrap().family(), Family::Wasm);
}

#[test]
fn rejects_unknown_and_bare_prefixes() {
    assert_eq!(Target::parse("solaris_sparc"), None);
    assert_eq!(Target::parse("linux_"), None);
    assert_eq!(Target::parse(""), None);
}

#[test]
fn exe_suffix_follows_family() {
    assert_eq!(Target::parse("linux_x64").unwrap().exe_suffix(), "kexe");
    assert_eq!(Target::parse("mingw_x64").unwrap().exe_suffix(), "exe");
    assert_eq!(Target::parse("wasm32").unwrap().exe_suffix(), "wasm");
}

#[test]
fn host_target_round_trips_through_parse() {
    let host = Target::host();
    assert_eq!(Target::parse(host.name()), Some(host.clone()));
    assert_eq!(host.to_string(), host.name());
}
