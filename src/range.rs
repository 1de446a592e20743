//! Column-range declarations.

use core::{fmt, ops, str::FromStr};

use thiserror::Error;

/// A reason a column-range declaration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The declaration has no comma separating its bounds.
    #[error("expected `<start>,<end>`")]
    MissingComma,
    /// A bound is not a non-negative base-10 integer.
    #[error("`{0}` is not a column number")]
    InvalidBound(String),
    /// Columns are numbered from one.
    #[error("columns start at 1")]
    ZeroStart,
    /// The start column lies after the end column.
    #[error("start column {start} is after end column {end}")]
    Reversed { start: usize, end: usize },
}

/// An inclusive, 1-indexed span of columns occupied by one field.
///
/// Always satisfies `1 <= start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: usize,
    end: usize,
}

impl Range {
    /// Create a range from inclusive, 1-indexed bounds.
    pub fn new(start: usize, end: usize) -> Result<Self, TagError> {
        if start == 0 {
            Err(TagError::ZeroStart)?
        }

        if start > end {
            Err(TagError::Reversed { start, end })?
        }

        Ok(Self { start, end })
    }

    /// Parse a declaration of the form `<start>,<end>`.
    ///
    /// Whitespace around either bound is ignored.
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        let (start, end) = tag.split_once(',').ok_or(TagError::MissingComma)?;
        Self::new(bound(start)?, bound(end)?)
    }

    /// First column, counting from one.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Last column, inclusive.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of columns, which is also the field's encoded width.
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// The 0-indexed, half-open byte span covered by this range.
    pub fn span(&self) -> ops::Range<usize> {
        self.start - 1..self.end
    }

    /// Take this range's bytes from a line.
    ///
    /// Any portion past the end of the line is simply missing, so a line that
    /// is too short yields a shorter (possibly empty) slice.
    pub fn slice<'a>(&self, line: &'a [u8]) -> &'a [u8] {
        let start = (self.start - 1).min(line.len());
        let end = self.end.min(line.len());
        &line[start..end]
    }
}

impl FromStr for Range {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.start, self.end)
    }
}

fn bound(s: &str) -> Result<usize, TagError> {
    let s = s.trim();

    // `usize::from_str` accepts a leading `+`, which a column number may not have.
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        Err(TagError::InvalidBound(s.to_string()))?
    }

    s.parse().map_err(|_| TagError::InvalidBound(s.to_string()))
}
