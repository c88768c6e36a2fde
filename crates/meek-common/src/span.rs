//! Span - source location tracking for AST nodes and diagnostics.
//!
//! A `Span` represents a half-open byte range `[start, end)` into the
//! original source buffer. It never owns the text it describes.

use serde::{Deserialize, Serialize};

/// A span of source code, represented as a byte range.
///
/// Spans use half-open intervals: `[start, end)`. An empty span has
/// `start == end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: u32,
    /// End byte offset (exclusive).
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create an empty span at the given position.
    #[inline]
    pub const fn at(pos: u32) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Create a dummy span used for synthetic/error nodes that have no
    /// real source position.
    #[inline]
    pub const fn dummy() -> Self {
        Span {
            start: u32::MAX,
            end: u32::MAX,
        }
    }

    #[inline]
    pub const fn is_dummy(&self) -> bool {
        self.start == u32::MAX && self.end == u32::MAX
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub const fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    #[inline]
    pub const fn contains_span(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Merge two spans into the smallest span covering both. Used to
    /// compute a parent node's span from its children.
    #[inline]
    pub const fn merge(&self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return *self;
        }
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Extract the slice of text covered by this span.
    #[inline]
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        text.get(start..end).unwrap_or("")
    }
}

impl From<(u32, u32)> for Span {
    fn from((start, end): (u32, u32)) -> Self {
        Span::new(start, end)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A trait for types that carry a source span.
pub trait Spanned {
    fn span(&self) -> Span;

    fn start(&self) -> u32 {
        self.span().start
    }

    fn end(&self) -> u32 {
        self.span().end
    }
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

/// Helper for building a span while parsing: capture the start position,
/// keep parsing, then close it off with the current position.
#[derive(Clone, Copy, Debug)]
pub struct SpanBuilder {
    start: u32,
}

impl SpanBuilder {
    #[inline]
    pub const fn start(pos: u32) -> Self {
        SpanBuilder { start: pos }
    }

    #[inline]
    pub const fn end(&self, pos: u32) -> Span {
        Span::new(self.start, pos)
    }
}

/// A 1-based (line, column) source position, computed from a byte offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// Translates byte offsets into 1-based line/column pairs for diagnostic
/// rendering. Built once per source file; line starts are found with a
/// single linear scan.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line. `line_starts[0] == 0`.
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        LineIndex { line_starts }
    }

    /// Resolve a byte offset to a 1-based line/column pair.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32 + 1,
            column: offset.saturating_sub(line_start) + 1,
        }
    }
}

#[cfg(test)]
#[path = "tests/span.rs"]
mod tests;
