//! Half-open page ranges over 0-based page indices

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// A half-open range `[start, end)` of 0-based page indices.
///
/// An `end` of zero or below counts back from the end of the document, so
/// `PageRange::new(3, 0)` is "page 3 to the last page" and `PageRange::new(0, -2)`
/// drops the last two pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "(usize, i64)", into = "(usize, i64)"))]
pub struct PageRange {
    pub start: usize,
    pub end: i64,
}

impl PageRange {
    pub fn new(start: usize, end: i64) -> Self {
        Self { start, end }
    }

    /// The single page `index`
    pub fn single(index: usize) -> Self {
        Self::new(index, index as i64 + 1)
    }

    /// Every page of the document
    pub fn all() -> Self {
        Self::new(0, 0)
    }

    /// Resolve against a document of `num_pages` pages.
    ///
    /// Returns `None` when the resolved end precedes `start` or lies past the last
    /// page. A range resolving to `start == end` is valid and selects nothing.
    pub fn resolve(&self, num_pages: usize) -> Option<Range<usize>> {
        let actual_end = if self.end <= 0 {
            num_pages as i64 + self.end
        } else {
            self.end
        };

        if actual_end < self.start as i64 || actual_end > num_pages as i64 {
            return None;
        }

        Some(self.start..actual_end as usize)
    }
}

impl From<(usize, i64)> for PageRange {
    fn from((start, end): (usize, i64)) -> Self {
        Self::new(start, end)
    }
}

impl From<PageRange> for (usize, i64) {
    fn from(range: PageRange) -> Self {
        (range.start, range.end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePageRangeError(String);

impl fmt::Display for ParsePageRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid page range '{}'", self.0)
    }
}

impl std::error::Error for ParsePageRangeError {}

impl FromStr for PageRange {
    type Err = ParsePageRangeError;

    /// Parse `START` (one page) or `START-END`. `END` may be `0` or negative.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePageRangeError(s.to_string());
        let s_trim = s.trim();

        match s_trim.split_once('-') {
            Some((start, end)) => {
                let start = start.trim().parse::<usize>().map_err(|_| err())?;
                let end = end.trim().parse::<i64>().map_err(|_| err())?;
                Ok(Self::new(start, end))
            }
            None => {
                let index = s_trim.parse::<usize>().map_err(|_| err())?;
                Ok(Self::single(index))
            }
        }
    }
}

/// Parse a comma-separated list of ranges, e.g. `0-29,31-0`
pub fn parse_ranges(s: &str) -> Result<Vec<PageRange>, ParsePageRangeError> {
    s.split(',').map(str::parse).collect()
}
