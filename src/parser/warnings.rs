//! Non-fatal parse warnings.
//!
//! Leniency substitutions (illegal matrix symbols replaced by the gap
//! character, asymmetric distances averaged, skipped unknown blocks) never
//! abort a read. They are queued here and only handed to the caller, and
//! emitted via [log], once the whole document was read successfully.

use std::fmt;

/// A single warning, tagged with the line it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseWarning {
    /// 1-based line number
    pub line: usize,
    /// Human readable description
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Ordered queue of [ParseWarning]s collected during one document read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Warnings {
    warnings: Vec<ParseWarning>,
}

impl Warnings {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a warning for the given line.
    pub fn push<M: Into<String>>(&mut self, line: usize, message: M) {
        self.warnings.push(ParseWarning {
            line,
            message: message.into(),
        });
    }

    /// Moves all warnings of `other` to the end of this queue.
    pub fn append(&mut self, other: &mut Warnings) {
        self.warnings.append(&mut other.warnings);
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseWarning> {
        self.warnings.iter()
    }

    /// Returns whether any warning message contains `needle`.
    pub fn any_mentions(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.message.contains(needle))
    }

    /// Emits every queued warning through the [log] facade.
    pub(crate) fn emit(&self) {
        for warning in &self.warnings {
            log::warn!("{warning}");
        }
    }
}

impl IntoIterator for Warnings {
    type Item = ParseWarning;
    type IntoIter = std::vec::IntoIter<ParseWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a ParseWarning;
    type IntoIter = std::slice::Iter<'a, ParseWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.warnings.iter()
    }
}
