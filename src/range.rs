//! Closed passage ranges and the annotation-cell decomposition rule.
//!
//! A cell such as `"3-5, 7, 12-14"` lists the passages an author mitigates
//! or rejects. Each comma-separated token becomes one [`PassageRange`].
//! A bare number `n` is read as the single-passage range `[n, n]`.

use serde::{Deserialize, Serialize};

use crate::errors::MalformedRangeError;

/// A closed interval `[start, end]` over passage numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "[u32; 2]", from = "[u32; 2]")]
pub struct PassageRange {
    pub start: u32,
    pub end: u32,
}

impl PassageRange {
    /// Create a range. Bounds are swapped if given in descending order so
    /// that `start <= end` always holds.
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// A range covering exactly one passage.
    pub fn single(number: u32) -> Self {
        Self {
            start: number,
            end: number,
        }
    }

    /// Closed-interval containment: `start <= number <= end`.
    pub fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }
}

impl From<PassageRange> for [u32; 2] {
    fn from(range: PassageRange) -> Self {
        [range.start, range.end]
    }
}

impl From<[u32; 2]> for PassageRange {
    fn from([start, end]: [u32; 2]) -> Self {
        PassageRange::new(start, end)
    }
}

impl std::fmt::Display for PassageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Count how many of `ranges` contain `number`. Overlapping ranges each count.
pub fn count_containing(ranges: &[PassageRange], number: u32) -> u32 {
    ranges.iter().filter(|range| range.contains(number)).count() as u32
}

/// Parse a single trimmed, non-empty token.
///
/// Returns `None` when the token is not `n` or `n-m` with unsigned integers.
pub fn parse_token(token: &str) -> Option<PassageRange> {
    match token.split_once('-') {
        None => token.trim().parse().ok().map(PassageRange::single),
        Some((start, end)) => {
            let start = start.trim().parse().ok()?;
            let end = end.trim().parse().ok()?;
            Some(PassageRange::new(start, end))
        }
    }
}

/// Decompose an annotation cell into ranges.
///
/// Splits on commas, trims each token and drops empty ones. Tokens are then
/// parsed with [`parse_token`]; the first unparsable token fails the whole
/// cell. `row` and `column` only serve the error report.
pub fn decompose(cell: &str, row: usize, column: &str) -> Result<Vec<PassageRange>, MalformedRangeError> {
    tokens(cell)
        .map(|token| {
            parse_token(token).ok_or_else(|| MalformedRangeError {
                token: token.to_string(),
                row,
                column: column.to_string(),
            })
        })
        .collect()
}

/// Like [`decompose`] but skips unparsable tokens, returning them alongside
/// the ranges that did parse.
pub fn decompose_lenient(cell: &str) -> (Vec<PassageRange>, Vec<String>) {
    let mut ranges = Vec::new();
    let mut rejected = Vec::new();
    for token in tokens(cell) {
        match parse_token(token) {
            Some(range) => ranges.push(range),
            None => rejected.push(token.to_string()),
        }
    }
    (ranges, rejected)
}

fn tokens(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(',').map(str::trim).filter(|token| !token.is_empty())
}
