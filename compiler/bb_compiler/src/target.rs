//! Compilation targets.

use std::fmt;

/// Operating system family of a target; decides the executable suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Linux,
    Osx,
    Ios,
    Android,
    Mingw,
    Wasm,
}

impl Family {
    /// Suffix (without the dot) of executables produced for this family.
    pub const fn exe_suffix(self) -> &'static str {
        match self {
            Family::Mingw => "exe",
            Family::Wasm => "wasm",
            Family::Linux | Family::Osx | Family::Ios | Family::Android => "kexe",
        }
    }

    fn from_target_name(name: &str) -> Option<Self> {
        const PREFIXES: [(&str, Family); 6] = [
            ("linux_", Family::Linux),
            ("macos_", Family::Osx),
            ("ios_", Family::Ios),
            ("android_", Family::Android),
            ("mingw_", Family::Mingw),
            ("wasm", Family::Wasm),
        ];
        PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix) && name.len() > prefix.len())
            .map(|&(_, family)| family)
    }
}

/// A compilation target, e.g. `linux_x64`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Target {
    name: String,
    family: Family,
}

impl Target {
    pub fn new(name: impl Into<String>, family: Family) -> Self {
        Target {
            name: name.into(),
            family,
        }
    }

    /// Parse a target name such as `macos_arm64` or `mingw_x64`.
    ///
    /// The family is taken from the name's prefix; the architecture part is
    /// passed to the compiler untouched.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Family::from_target_name(name).map(|family| Target::new(name, family))
    }

    /// The target matching the machine this harness was built for.
    pub fn host() -> Self {
        let (os, family) = if cfg!(target_os = "macos") {
            ("macos", Family::Osx)
        } else if cfg!(windows) {
            ("mingw", Family::Mingw)
        } else {
            ("linux", Family::Linux)
        };
        let arch = if cfg!(target_arch = "aarch64") {
            "arm64"
        } else {
            "x64"
        };
        Target::new(format!("{os}_{arch}"), family)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn exe_suffix(&self) -> &'static str {
        self.family.exe_suffix()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
