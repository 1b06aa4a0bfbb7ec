//! Citation matching and substitution
//!
//! A citation is a `<name>.js, Line: <n>` token inside a line that assigns
//! `req.err = `. Rewriting replaces every such token with the file's own
//! base name and the line's 1-based position.
//!
//! Matching works on bytes. The trigger and tokens are ASCII, so content in
//! any encoding passes through and only the tokens themselves change.

use std::borrow::Cow;

use regex::bytes::{NoExpand, Regex};

use crate::domain::{DomainError, LineBuffer};

/// Literal that makes a line eligible for substitution.
pub const TRIGGER: &str = "req.err = ";

/// Base names that are rewritten: word characters, then `.js`.
pub const FILE_NAME_PATTERN: &str = r"^[A-Za-z0-9_]+\.js$";

/// Citation token inside a marker line.
pub const TOKEN_PATTERN: &str = r"[A-Za-z0-9_]+\.js, Line: [0-9]+";

/// Compiled file-name and token patterns.
#[derive(Debug, Clone)]
pub struct CitationRewriter {
    file_name: Regex,
    token: Regex,
}

fn compile(pattern: &str) -> Result<Regex, DomainError> {
    Regex::new(pattern).map_err(|source| DomainError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl CitationRewriter {
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            file_name: compile(FILE_NAME_PATTERN)?,
            token: compile(TOKEN_PATTERN)?,
        })
    }

    /// Whether a base name (no directory part) selects the file for rewriting.
    pub fn is_candidate(&self, file_name: &str) -> bool {
        self.file_name.is_match(file_name.as_bytes())
    }

    /// Rewrite all citation tokens in a marker line.
    ///
    /// Lines without [`TRIGGER`] are returned borrowed and untouched.
    pub fn rewrite_line<'a>(&self, line: &'a [u8], file_name: &str, line_no: usize) -> Cow<'a, [u8]> {
        if !contains_trigger(line) {
            return Cow::Borrowed(line);
        }
        let replacement = format!("{}, Line: {}", file_name, line_no);
        self.token.replace_all(line, NoExpand(replacement.as_bytes()))
    }

    /// Rewrite a whole file's content.
    ///
    /// Returns the new buffer and the number of lines whose text changed.
    pub fn rewrite(&self, content: &[u8], file_name: &str) -> (LineBuffer, usize) {
        let mut buffer = LineBuffer::from_content(content);
        let mut rewritten = 0;

        for (idx, line) in buffer.lines_mut().iter_mut().enumerate() {
            let new_line = match self.rewrite_line(line, file_name, idx + 1) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(new_line) => new_line,
            };
            if new_line != *line {
                *line = new_line;
                rewritten += 1;
            }
        }

        (buffer, rewritten)
    }
}

fn contains_trigger(line: &[u8]) -> bool {
    line.windows(TRIGGER.len()).any(|w| w == TRIGGER.as_bytes())
}
