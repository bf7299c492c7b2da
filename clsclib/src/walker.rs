//! Recursive discovery of eligible source files.
//!
//! Results are appended to a fresh vector as the tree is read, in directory
//! read order. Only regular files are candidates; symbolic links are neither
//! followed nor counted. Hidden directories are descended into, since the
//! hidden rule applies to file names only.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ClscError;
use crate::filter::FilterConfig;
use crate::options::FailurePolicy;
use crate::stats::SkippedEntry;
use crate::Result;

/// Files found by a walk, plus directories skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedEntry>,
}

/// Collect every eligible file under `root`.
///
/// An unreadable root always fails with [`ClscError::DirectoryUnreadable`].
/// An unreadable nested directory fails the walk under
/// [`FailurePolicy::Abort`] and is recorded in [`WalkOutcome::skipped`]
/// under [`FailurePolicy::Skip`].
///
/// Finding nothing is not an error here; callers decide what an empty
/// outcome means.
pub fn collect(
    root: impl AsRef<Path>,
    filter: &FilterConfig,
    policy: FailurePolicy,
) -> Result<WalkOutcome> {
    let root = root.as_ref();
    let mut outcome = WalkOutcome::default();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let depth = err.depth();
                let path = err.path().unwrap_or(root).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::other("directory traversal failed"));

                if depth == 0 || policy == FailurePolicy::Abort {
                    return Err(ClscError::DirectoryUnreadable { path, source });
                }

                warn!("skipping unreadable directory {}: {}", path.display(), source);
                outcome
                    .skipped
                    .push(SkippedEntry::new(path, source.to_string()));
                continue;
            }
        };

        if entry.file_type().is_file() && filter.matches(entry.path()) {
            debug!("found {}", entry.path().display());
            outcome.files.push(entry.into_path());
        }
    }

    Ok(outcome)
}
