//! # clsclib
//!
//! A line counter for C source trees that classifies every line as blank,
//! comment, or code.
//!
//! ## Overview
//!
//! The library is a small pipeline:
//!
//! - **Filter**: which files count (`.c` by default, hidden files excluded,
//!   optional include/exclude globs)
//! - **Walker**: recursive discovery of eligible files
//! - **Classifier**: a per-file scanner that tracks `/* ... */` comments
//!   across lines
//! - **Dispatcher**: one unit of work per file, on per-file threads or a
//!   bounded pool, joined before anything is summed
//! - **Aggregate**: totals across all files
//!
//! Classification is lexical only. `//`, `/*` and `*/` are recognized
//! wherever they occur, string literals and preprocessor directives are not
//! treated specially.
//!
//! ## Example
//!
//! ```rust
//! use clsclib::{count_path, CountOptions, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("src")).unwrap();
//! fs::write(
//!     dir.path().join("src/main.c"),
//!     "/* entry */\nint main(void) {\n\n    return 0; // ok\n}\n",
//! ).unwrap();
//!
//! // Count a directory tree
//! let result = count_path(dir.path(), &CountOptions::new()).unwrap();
//! assert_eq!(result.report.file_count, 1);
//! assert_eq!(result.report.totals.code, 3);
//! assert_eq!(result.report.totals.comment, 1);
//! assert_eq!(result.report.totals.blank, 1);
//!
//! // Count with filtering
//! let filter = FilterConfig::new().exclude("**/generated/**").unwrap();
//! let result = count_path(dir.path(), &CountOptions::new().filter(filter)).unwrap();
//! assert_eq!(result.report.file_count, 1);
//! ```

pub mod aggregate;
pub mod classifier;
pub mod counter;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod options;
pub mod stats;
pub mod walker;

pub use aggregate::reduce;
pub use classifier::{classify_file, classify_reader, classify_str, ClassificationState};
pub use counter::{count_directory, count_file, count_path, PathKind};
pub use dispatcher::{Dispatch, WorkDispatcher};
pub use error::ClscError;
pub use filter::{FilterConfig, DEFAULT_EXTENSION};
pub use options::{Concurrency, CountOptions, FailurePolicy};
pub use stats::{AggregateReport, CountResult, FileRecord, LineCounts, LineKind, SkippedEntry};
pub use walker::WalkOutcome;

/// Result type for clsclib operations
pub type Result<T> = std::result::Result<T, ClscError>;
