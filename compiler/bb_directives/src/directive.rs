//! Directive recognition.
//!
//! A directive is a line comment of the form `// NAME` or `// NAME: v1 v2`.
//! Lines that look like directives but carry an unknown name are not
//! directives at this layer; they stay in the source text for whatever
//! consumes it downstream.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rustc_hash::FxHashMap;

/// Directives understood by the black-box test layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    /// `// FILE: name.kt` starts a new virtual file.
    File,
    /// `// STANDALONE` compiles the test into its own binary.
    Standalone,
    /// `// FREE_COMPILER_ARGS: ...` passes extra arguments to the compiler.
    FreeCompilerArgs,
}

impl Directive {
    /// All recognized directives.
    pub const ALL: [Directive; 3] = [
        Directive::File,
        Directive::Standalone,
        Directive::FreeCompilerArgs,
    ];

    /// The name as written in test data.
    pub const fn name(self) -> &'static str {
        match self {
            Directive::File => "FILE",
            Directive::Standalone => "STANDALONE",
            Directive::FreeCompilerArgs => "FREE_COMPILER_ARGS",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Whether the directive accepts values after the colon.
    pub const fn takes_values(self) -> bool {
        !matches!(self, Directive::Standalone)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Directive::File => "Usage: // FILE: name.kt\nDeclares file with specified name in current module",
            Directive::Standalone => {
                "Compile this test as a standalone binary (don't include it into the shared test binary)"
            }
            Directive::FreeCompilerArgs => "Specify free compiler arguments for the native compiler",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A directive-shaped line, before its name is checked against [`Directive`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawDirective<'a> {
    pub name: &'a str,
    /// `None` when the line has no colon, otherwise the whitespace-separated values.
    pub values: Option<Vec<&'a str>>,
}

impl<'a> RawDirective<'a> {
    /// Parse a line of test data. Returns `None` for ordinary source lines.
    pub fn parse(line: &'a str) -> Option<Self> {
        let captures = directive_regex().captures(line.trim_end())?;
        let name = captures.get(1)?.as_str();
        let values = captures
            .get(2)
            .map(|raw| raw.as_str().split_whitespace().collect());
        Some(RawDirective { name, values })
    }

    /// Resolve against the recognized directives.
    pub fn recognize(&self) -> Option<Directive> {
        Directive::from_name(self.name)
    }

    /// Values as owned strings; empty when the line had no colon.
    pub fn owned_values(&self) -> Vec<String> {
        self.values
            .iter()
            .flatten()
            .map(|v| (*v).to_string())
            .collect()
    }
}

#[expect(clippy::expect_used, reason = "literal pattern is known to compile")]
fn directive_regex() -> &'static Regex {
    static DIRECTIVE: OnceLock<Regex> = OnceLock::new();
    DIRECTIVE.get_or_init(|| {
        Regex::new(r"^//\s*!?([A-Z0-9_]+)(?::[ \t]*(.*))?$").expect("directive regex")
    })
}

/// Directives collected from one test-data file.
///
/// Marker directives are recorded with an empty value list; repeated
/// directives accumulate their values in order of appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisteredDirectives {
    values: FxHashMap<Directive, Vec<String>>,
}

impl RegisteredDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, directive: Directive, values: impl IntoIterator<Item = String>) {
        self.values.entry(directive).or_default().extend(values);
    }

    pub fn contains(&self, directive: Directive) -> bool {
        self.values.contains_key(&directive)
    }

    /// All values registered for `directive`, empty if it never appeared.
    pub fn values(&self, directive: Directive) -> &[String] {
        self.values.get(&directive).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
