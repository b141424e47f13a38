//! Compiler diagnostics.
//!
//! The compiler reports diagnostics as a line-oriented stream:
//!
//! ```text
//! error: /abs/path/main.kt:3:5: unresolved reference: foo
//! /abs/path/main.kt:7:1: warning: variable 'y' is never used
//! warning: parameter 'x' is never used
//! info: produced program in 1200 ms
//! ```
//!
//! The location may come before or after the severity label. A line that
//! carries no severity label continues the previous
//! message (stack traces of `exception:` messages, multi-line notes). Such a
//! line at the very start of the stream becomes an [`Severity::Output`]
//! message.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Diagnostic severity, most severe first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Exception,
    Error,
    StrongWarning,
    Warning,
    Info,
    Logging,
    Output,
}

impl Severity {
    /// All severities, ordered so that no label is a prefix of a later one.
    const ALL: [Severity; 7] = [
        Severity::Exception,
        Severity::Error,
        Severity::StrongWarning,
        Severity::Warning,
        Severity::Info,
        Severity::Logging,
        Severity::Output,
    ];

    fn from_label(label: &str) -> Option<Severity> {
        Severity::ALL.into_iter().find(|severity| severity.label() == label)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Severity::Exception => "exception",
            Severity::Error => "error",
            Severity::StrongWarning => "strong warning",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Logging => "logging",
            Severity::Output => "output",
        }
    }

    /// Whether a message of this severity fails the compilation.
    pub const fn is_error(self) -> bool {
        matches!(self, Severity::Exception | Severity::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source position a message points at. `line` and `column` are 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLocation {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for MessageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// One diagnostic reported by the compiler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerMessage {
    pub severity: Severity,
    pub location: Option<MessageLocation>,
    pub text: String,
}

impl CompilerMessage {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        CompilerMessage {
            severity,
            location: None,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn at(mut self, path: impl Into<String>, line: u32, column: u32) -> Self {
        self.location = Some(MessageLocation {
            path: path.into(),
            line,
            column,
        });
        self
    }
}

impl fmt::Display for CompilerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.severity == Severity::Output {
            return f.write_str(&self.text);
        }
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "{}: {}", self.severity, self.text)
    }
}

/// Parse the compiler's diagnostic stream.
pub fn parse_messages(stream: &str) -> Vec<CompilerMessage> {
    let mut messages: Vec<CompilerMessage> = Vec::new();

    for line in stream.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some(message) = parse_line(line) {
            messages.push(message);
        } else if let Some(previous) = messages.last_mut() {
            previous.text.push('\n');
            previous.text.push_str(line);
        } else {
            messages.push(CompilerMessage::new(Severity::Output, line));
        }
    }

    messages
}

fn parse_line(line: &str) -> Option<CompilerMessage> {
    if let Some((severity, rest)) = split_severity(line) {
        return Some(parse_body(severity, rest));
    }
    let captures = located_first_regex().captures(line)?;
    let severity = Severity::from_label(&captures[4])?;
    let line_number = captures[2].parse().ok()?;
    let column = captures[3].parse().ok()?;
    Some(CompilerMessage::new(severity, &captures[5]).at(&captures[1], line_number, column))
}

fn split_severity(line: &str) -> Option<(Severity, &str)> {
    Severity::ALL.into_iter().find_map(|severity| {
        line.strip_prefix(severity.label())
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|rest| (severity, rest.trim_start()))
    })
}

#[expect(clippy::expect_used, reason = "literal pattern is known to compile")]
fn location_regex() -> &'static Regex {
    static LOCATION: OnceLock<Regex> = OnceLock::new();
    LOCATION.get_or_init(|| Regex::new(r"^(.+?):(\d+):(\d+): (.*)$").expect("location regex"))
}

#[expect(clippy::expect_used, reason = "literal pattern is known to compile")]
fn located_first_regex() -> &'static Regex {
    static LOCATED_FIRST: OnceLock<Regex> = OnceLock::new();
    LOCATED_FIRST.get_or_init(|| {
        Regex::new(r"^(.+?):(\d+):(\d+): ([a-z]+(?: [a-z]+)?): (.*)$").expect("located-first regex")
    })
}

fn parse_body(severity: Severity, body: &str) -> CompilerMessage {
    let located = location_regex().captures(body).and_then(|captures| {
        let line = captures[2].parse().ok()?;
        let column = captures[3].parse().ok()?;
        Some(CompilerMessage::new(severity, &captures[4]).at(&captures[1], line, column))
    });
    located.unwrap_or_else(|| CompilerMessage::new(severity, body))
}

/// Human-readable rendering, grouped by file.
///
/// Messages without a location come first in their original order, then the
/// messages of each file in order of the file's first appearance.
pub fn render_plain(messages: &[CompilerMessage]) -> String {
    let mut groups: Vec<(Option<&str>, Vec<&CompilerMessage>)> = vec![(None, Vec::new())];

    for message in messages {
        let path = message.location.as_ref().map(|l| l.path.as_str());
        match groups.iter_mut().find(|(group, _)| *group == path) {
            Some((_, members)) => members.push(message),
            None => groups.push((path, vec![message])),
        }
    }

    let mut out = String::new();
    for message in groups.iter().flat_map(|(_, members)| members) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&message.to_string());
    }
    out
}
