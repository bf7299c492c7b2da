//! Core data structures for line statistics

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

/// Category a single line falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    /// Whitespace only, outside a block comment
    Blank,
    /// Only comment content (or whitespace inside a block comment)
    Comment,
    /// Anything else that is not whitespace or comment
    Code,
}

/// Line counts for one file or a set of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCounts {
    /// Blank lines (whitespace only)
    pub blank: u64,
    /// Comment lines (`//`, `/* */`, and lines inside a block comment)
    pub comment: u64,
    /// Lines holding any code, even with a trailing comment
    pub code: u64,
}

impl LineCounts {
    /// Create a new LineCounts with all zeros
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lines counted
    pub fn total(&self) -> u64 {
        self.blank + self.comment + self.code
    }

    /// Count one line of the given kind
    pub fn record(&mut self, kind: LineKind) {
        match kind {
            LineKind::Blank => self.blank += 1,
            LineKind::Comment => self.comment += 1,
            LineKind::Code => self.code += 1,
        }
    }
}

impl Add for LineCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            blank: self.blank + other.blank,
            comment: self.comment + other.comment,
            code: self.code + other.code,
        }
    }
}

impl AddAssign for LineCounts {
    fn add_assign(&mut self, other: Self) {
        self.blank += other.blank;
        self.comment += other.comment;
        self.code += other.code;
    }
}

impl Sum for LineCounts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

impl<'a> Sum<&'a LineCounts> for LineCounts {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Counts for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path to the file
    pub path: PathBuf,
    /// Line counts for this file
    pub counts: LineCounts,
}

impl FileRecord {
    /// Create a new file record
    pub fn new(path: PathBuf, counts: LineCounts) -> Self {
        Self { path, counts }
    }
}

/// Totals across every counted file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Number of files counted
    pub file_count: u64,
    /// Summed line counts
    pub totals: LineCounts,
}

/// An entry left out of the count under the skip policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// File or directory that was skipped
    pub path: PathBuf,
    /// Human readable reason
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            path,
            reason: reason.into(),
        }
    }
}

/// Result of counting a file or a directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResult {
    /// Aggregated totals
    pub report: AggregateReport,
    /// Per-file records (only if requested)
    pub files: Vec<FileRecord>,
    /// Entries skipped because they could not be read
    pub skipped: Vec<SkippedEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_counts_default() {
        let counts = LineCounts::new();
        assert_eq!(counts.blank, 0);
        assert_eq!(counts.comment, 0);
        assert_eq!(counts.code, 0);
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_line_counts_record() {
        let mut counts = LineCounts::new();
        counts.record(LineKind::Code);
        counts.record(LineKind::Code);
        counts.record(LineKind::Comment);
        counts.record(LineKind::Blank);

        assert_eq!(
            counts,
            LineCounts {
                blank: 1,
                comment: 1,
                code: 2
            }
        );
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_line_counts_add() {
        let a = LineCounts {
            blank: 10,
            comment: 5,
            code: 100,
        };
        let b = LineCounts {
            blank: 5,
            comment: 2,
            code: 50,
        };
        let sum = a + b;
        assert_eq!(sum.blank, 15);
        assert_eq!(sum.comment, 7);
        assert_eq!(sum.code, 150);

        let mut acc = a;
        acc += b;
        assert_eq!(acc, sum);
    }

    #[test]
    fn test_line_counts_sum() {
        let all = [
            LineCounts {
                blank: 1,
                comment: 2,
                code: 3,
            },
            LineCounts {
                blank: 4,
                comment: 5,
                code: 6,
            },
        ];
        let total: LineCounts = all.iter().sum();
        assert_eq!(total.total(), 21);
        assert_eq!(total.code, 9);
    }
}
