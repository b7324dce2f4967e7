//! Byte ranges and line/column mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `start..end` into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl TextRange {
    /// Creates a range; `end` is clamped to be at least `start`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Creates an empty range at `offset`.
    #[must_use]
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Creates a range from a start offset and a length.
    #[must_use]
    pub fn at(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when the range covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `offset` lies in `start..end`.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `offset` lies in `start..=end`.
    #[must_use]
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Returns true if `other` lies entirely inside `self`.
    #[must_use]
    pub fn contains_range(&self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two ranges share at least one byte.
    ///
    /// Two empty ranges at the same offset are also considered overlapping,
    /// since edits at one insertion point cannot be ordered.
    #[must_use]
    pub fn overlaps(&self, other: TextRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return self.start == other.start
                || (self.start > other.start && self.start < other.end)
                || (other.start > self.start && other.start < self.end);
        }
        self.start < other.end && other.start < self.end
    }

    /// Shifts the range right by `delta` bytes.
    #[must_use]
    pub fn shifted(&self, delta: usize) -> Self {
        Self::new(self.start + delta, self.end + delta)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Maps byte offsets to 1-indexed line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Builds an index for `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Returns the 1-indexed `(line, column)` for a byte offset.
    ///
    /// Columns count bytes, matching how offsets are stored.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        (line + 1, offset - self.line_starts[line] + 1)
    }

    /// Number of lines in the indexed text.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
