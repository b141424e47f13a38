//! Splitting a test-data file into virtual source files.
//!
//! The [`Splitter`] is a single forward pass over the lines of one test-data
//! file. It owns all scanning state: the files finished so far, the name and
//! text of the file being accumulated, and the directives seen.
//!
//! Line numbers are preserved in every generated file:
//! - a recognized directive line is replaced by an empty line;
//! - a `FILE` directive on line N starts the new file with N empty lines,
//!   followed by the (emptied) directive line itself.

use std::path::{Path, PathBuf};

use crate::{
    Directive, RawDirective, RegisteredDirectives, ValidationError, ValidationErrorKind,
    DEFAULT_FILE_NAME, SOURCE_EXTENSION,
};

/// One virtual source file cut out of a test-data file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitFile {
    pub name: String,
    pub contents: String,
}

/// Everything extracted from one test-data file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitOutput {
    /// Files in order of appearance.
    pub files: Vec<SplitFile>,
    pub directives: RegisteredDirectives,
}

/// Split `text` (the contents of the test-data file at `origin`).
///
/// `origin` is used only for error locations.
pub fn split(origin: &Path, text: &str) -> Result<SplitOutput, ValidationError> {
    let mut splitter = Splitter::new(origin);
    for (index, line) in text.lines().enumerate() {
        splitter.feed(index, line)?;
    }
    Ok(splitter.finish())
}

/// Line-by-line splitting state.
#[derive(Debug)]
pub struct Splitter {
    origin: PathBuf,
    files: Vec<SplitFile>,
    current_name: Option<String>,
    current_contents: String,
    directives: RegisteredDirectives,
}

impl Splitter {
    pub fn new(origin: &Path) -> Self {
        Splitter {
            origin: origin.to_path_buf(),
            files: Vec::new(),
            current_name: None,
            current_contents: String::new(),
            directives: RegisteredDirectives::new(),
        }
    }

    /// Consume the line at 0-based `index`. Lines must be fed in order.
    pub fn feed(&mut self, index: usize, line: &str) -> Result<(), ValidationError> {
        let directive = RawDirective::parse(line)
            .and_then(|raw| raw.recognize().map(|directive| (directive, raw)));

        let Some((directive, raw)) = directive else {
            self.current_contents.push_str(line);
            self.current_contents.push('\n');
            return Ok(());
        };

        match directive {
            Directive::File => {
                let name = self.new_file_name(index, &raw)?;
                self.finish_file(Some(name), index);
            }
            Directive::Standalone | Directive::FreeCompilerArgs => {
                let values = raw.owned_values();
                if !directive.takes_values() && !values.is_empty() {
                    return Err(self.error(
                        index,
                        ValidationErrorKind::UnexpectedArguments {
                            directive,
                            found: values,
                        },
                    ));
                }
                self.directives.register(directive, values);
            }
        }

        self.current_contents.push('\n');
        Ok(())
    }

    /// Flush the last file and return the result.
    pub fn finish(mut self) -> SplitOutput {
        self.finish_file(None, 0);
        SplitOutput {
            files: self.files,
            directives: self.directives,
        }
    }

    fn new_file_name(&self, index: usize, raw: &RawDirective<'_>) -> Result<String, ValidationError> {
        let [name] = raw.values.as_deref().unwrap_or_default() else {
            return Err(self.error(
                index,
                ValidationErrorKind::FileArity {
                    found: raw.owned_values(),
                },
            ));
        };

        if !is_valid_file_name(name) {
            return Err(self.error(
                index,
                ValidationErrorKind::InvalidFileName {
                    name: (*name).to_string(),
                },
            ));
        }

        let taken = self.current_name.as_deref() == Some(*name)
            || self.files.iter().any(|file| file.name == *name)
            || (*name == DEFAULT_FILE_NAME
                && self.current_name.is_none()
                && !self.current_contents.trim().is_empty());
        if taken {
            return Err(self.error(
                index,
                ValidationErrorKind::DuplicateFileName {
                    name: (*name).to_string(),
                },
            ));
        }

        Ok((*name).to_string())
    }

    /// Push the accumulated file (unless it is unnamed and blank) and start
    /// `next` padded up to line `index`.
    fn finish_file(&mut self, next: Option<String>, index: usize) {
        let contents = std::mem::take(&mut self.current_contents);
        let name = self.current_name.take();

        if name.is_some() || !contents.trim().is_empty() {
            self.files.push(SplitFile {
                name: name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
                contents,
            });
        }

        if let Some(next) = next {
            self.current_name = Some(next);
            self.current_contents = "\n".repeat(index);
        }
    }

    fn error(&self, index: usize, kind: ValidationErrorKind) -> ValidationError {
        ValidationError {
            path: self.origin.clone(),
            line: index + 1,
            kind,
        }
    }
}

/// A plain `name.kt`: the extension, something before it, no path separators.
fn is_valid_file_name(name: &str) -> bool {
    name.strip_suffix(SOURCE_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .is_some_and(|stem| !stem.is_empty())
        && !name.contains(['/', '\\'])
}
