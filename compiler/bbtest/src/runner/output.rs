//! Parsing the run/status protocol printed by test binaries.
//!
//! ```text
//! [ RUN      ] codegen.box.simple.box
//! [       OK ] codegen.box.simple.box (0 ms)
//! ```
//!
//! A run line must be followed immediately by its status line. Any other
//! output between pairs is ignored.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

/// Prefix announcing that a test starts.
pub const RUN_LINE_PREFIX: &str = "[ RUN      ]";

/// Status of a passing test.
pub const STATUS_OK: &str = "OK";

/// Status keyword → names of tests reported with it.
pub type StatusTable = BTreeMap<String, BTreeSet<String>>;

/// A status line was expected but something else came.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
}

#[expect(clippy::expect_used, reason = "literal pattern is known to compile")]
fn status_line_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^\[\s+([A-Z]+)\s+]\s+(\S+)\s+.*$").expect("status line regex"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ExpectingAnything,
    ExpectingStatusLine,
}

/// Line-by-line protocol state.
#[derive(Debug)]
struct StatusParser {
    state: State,
    table: StatusTable,
}

impl StatusParser {
    fn new() -> Self {
        StatusParser {
            state: State::ExpectingAnything,
            table: StatusTable::new(),
        }
    }

    fn feed(&mut self, line_number: usize, line: &str) -> Result<(), MalformedLine> {
        match self.state {
            State::ExpectingAnything => {
                if line.starts_with(RUN_LINE_PREFIX) {
                    self.state = State::ExpectingStatusLine;
                }
            }
            State::ExpectingStatusLine => {
                let captures = status_line_regex()
                    .captures(line)
                    .ok_or_else(|| MalformedLine {
                        line_number,
                        line: line.to_string(),
                    })?;
                // A name may end up under several statuses; each is kept.
                self.table
                    .entry(captures[1].to_string())
                    .or_default()
                    .insert(captures[2].to_string());
                self.state = State::ExpectingAnything;
            }
        }
        Ok(())
    }

    fn finish(self) -> StatusTable {
        self.table
    }
}

/// Collect status lines from `stdout` into a table.
pub fn parse_status_lines(stdout: &str) -> Result<StatusTable, MalformedLine> {
    let mut parser = StatusParser::new();
    for (index, line) in stdout.lines().enumerate() {
        parser.feed(index + 1, line)?;
    }
    Ok(parser.finish())
}
