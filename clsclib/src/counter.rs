//! High-level counting API.
//!
//! This module wires the pipeline together: decide whether the input is a
//! file or a directory, discover files, dispatch one classification per file,
//! and reduce the results into a report.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::aggregate::reduce;
use crate::classifier::classify_file;
use crate::dispatcher::{Dispatch, WorkDispatcher};
use crate::error::ClscError;
use crate::options::CountOptions;
use crate::stats::{CountResult, LineCounts, SkippedEntry};
use crate::walker;
use crate::Result;

/// What kind of filesystem object a path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    /// Inspect `path`, following symbolic links. A path that cannot be
    /// inspected, or names neither a regular file nor a directory, fails with
    /// [`ClscError::InvalidPath`].
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata =
            fs::metadata(path).map_err(|_| ClscError::InvalidPath(path.to_path_buf()))?;

        if metadata.is_dir() {
            Ok(PathKind::Directory)
        } else if metadata.is_file() {
            Ok(PathKind::File)
        } else {
            Err(ClscError::InvalidPath(path.to_path_buf()))
        }
    }
}

/// Count a single source file or every eligible file below a directory.
///
/// # Example
///
/// ```rust,ignore
/// use clsclib::{count_path, CountOptions};
///
/// let result = count_path("src/", &CountOptions::new())?;
/// println!("{} files, {} code lines", result.report.file_count, result.report.totals.code);
/// ```
pub fn count_path(path: impl AsRef<Path>, options: &CountOptions) -> Result<CountResult> {
    let path = path.as_ref();

    match PathKind::detect(path)? {
        PathKind::Directory => count_directory(path, options),
        PathKind::File => count_source_file(path, options),
    }
}

/// Count every eligible file below `path`.
///
/// A directory without eligible files fails with
/// [`ClscError::NoEligibleFiles`] rather than producing an empty report.
pub fn count_directory(path: impl AsRef<Path>, options: &CountOptions) -> Result<CountResult> {
    let path = path.as_ref();

    let walk = walker::collect(path, &options.filter, options.failure_policy)?;
    info!("found {} files under {}", walk.files.len(), path.display());

    let dispatch = WorkDispatcher::from_options(options).run(path, &walk.files)?;

    Ok(build_result(dispatch, walk.skipped, options))
}

/// Count one file given directly, after checking that it is a source file.
fn count_source_file(path: &Path, options: &CountOptions) -> Result<CountResult> {
    let eligible = path
        .file_name()
        .is_some_and(|name| options.filter.is_eligible(&name.to_string_lossy()));

    if !eligible {
        return Err(ClscError::NotSourceFile {
            path: path.to_path_buf(),
            extension: options.filter.extension().to_string(),
        });
    }

    let paths = [path.to_path_buf()];
    let dispatch = WorkDispatcher::from_options(options).run(path, &paths)?;

    Ok(build_result(dispatch, Vec::new(), options))
}

fn build_result(
    dispatch: Dispatch,
    mut skipped: Vec<SkippedEntry>,
    options: &CountOptions,
) -> CountResult {
    let report = reduce(&dispatch.records);
    skipped.extend(dispatch.skipped);

    info!(
        "counted {} files: {} blank, {} comment, {} code",
        report.file_count, report.totals.blank, report.totals.comment, report.totals.code
    );

    CountResult {
        report,
        files: if options.per_file_stats {
            dispatch.records
        } else {
            Vec::new()
        },
        skipped,
    }
}

/// Count lines in a single file, without eligibility checks or threads.
///
/// # Example
///
/// ```rust,ignore
/// use clsclib::count_file;
///
/// let counts = count_file("src/main.c")?;
/// println!("Code: {}, Comments: {}", counts.code, counts.comment);
/// ```
pub fn count_file(path: impl AsRef<Path>) -> Result<LineCounts> {
    classify_file(path)
}
