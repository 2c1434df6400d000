//! Host documents: files the tool mutates but does not own.
//!
//! A host is held as an ordered list of lines. Parsing remembers the line
//! ending and whether the text ended with a newline so that rendering an
//! untouched document reproduces the input byte for byte.

use std::collections::BTreeSet;

use crate::domain::value_objects::{Fragment, UniquenessToken};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDocument {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
}

impl HostDocument {
    pub fn parse(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with('\n');
        let lines = text.lines().map(str::to_string).collect();
        Self {
            lines,
            line_ending,
            trailing_newline,
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            out.push_str(self.line_ending);
        }
        out
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Idempotency check for a single token.
    pub fn is_applied(&self, token: &UniquenessToken) -> bool {
        if token.as_str().contains('\n') {
            return self.render().contains(token.as_str());
        }
        self.lines.iter().any(|l| l.contains(token.as_str()))
    }

    /// The subset of `tokens` already present in this document.
    pub fn applied<'t, I>(&self, tokens: I) -> BTreeSet<&'t UniquenessToken>
    where
        I: IntoIterator<Item = &'t UniquenessToken>,
    {
        tokens.into_iter().filter(|t| self.is_applied(t)).collect()
    }

    /// Splice `fragment` so its first line lands at `index`. Indices past the
    /// end append.
    pub fn insert_at(&mut self, index: usize, fragment: &Fragment) {
        let index = index.min(self.lines.len());
        let new_lines: Vec<String> = fragment.lines().map(str::to_string).collect();
        self.lines.splice(index..index, new_lines);
    }

    pub fn append(&mut self, fragment: &Fragment) {
        self.insert_at(self.lines.len(), fragment);
        // An appended document should end cleanly.
        self.trailing_newline = true;
    }
}
