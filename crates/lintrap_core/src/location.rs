//! Source locations for lints and parse errors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in a document.
///
/// Lines and columns are 1-indexed. Zero is accepted for positions that are
/// not known precisely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Location {
    /// Creates a new location.
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Location of the first character of a document.
    #[inline]
    pub const fn start() -> Self {
        Self::new(1, 1)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.line, self.column)
    }
}

/// An inclusive range between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRange {
    /// First position covered by the range.
    pub begin: Location,
    /// Last position covered by the range.
    pub end: Location,
}

impl SourceRange {
    /// Creates a new range.
    #[inline]
    pub const fn new(begin: Location, end: Location) -> Self {
        Self { begin, end }
    }

    /// Creates a range covering a single location.
    #[inline]
    pub const fn at(line: u32, column: u32) -> Self {
        let loc = Location::new(line, column);
        Self::new(loc, loc)
    }
}

impl Default for SourceRange {
    fn default() -> Self {
        Self::at(1, 1)
    }
}
