//! Fan-out/fan-in over a list of files.
//!
//! Every path gets its own unit of work, and every unit returns its result
//! into the slot with the same index as its path. Units share nothing but
//! the read-only path list, so no locking is involved. All units are joined
//! before any result is looked at.
//!
//! Two schedules are available:
//!
//! - [`Concurrency::PerFile`]: one scoped OS thread per file.
//! - [`Concurrency::Pool`]: a bounded rayon pool, which keeps thread and
//!   file descriptor usage flat on large trees.
//!
//! Both produce identical results.

use std::panic;
use std::path::{Path, PathBuf};
use std::thread;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classifier::classify_file;
use crate::error::ClscError;
use crate::options::{Concurrency, CountOptions, FailurePolicy};
use crate::stats::{FileRecord, LineCounts, SkippedEntry};
use crate::Result;

/// Records gathered from the workers, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub records: Vec<FileRecord>,
    pub skipped: Vec<SkippedEntry>,
}

/// Runs one classification per path and gathers the results.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkDispatcher {
    concurrency: Concurrency,
    policy: FailurePolicy,
}

impl WorkDispatcher {
    pub fn new(concurrency: Concurrency, policy: FailurePolicy) -> Self {
        Self {
            concurrency,
            policy,
        }
    }

    pub fn from_options(options: &CountOptions) -> Self {
        Self::new(options.concurrency, options.failure_policy)
    }

    /// Classify every path. `origin` is the file or directory the paths came
    /// from and is only used for error reporting.
    ///
    /// Fails with [`ClscError::NoEligibleFiles`] when `paths` is empty, or
    /// when every file was skipped.
    pub fn run(&self, origin: &Path, paths: &[PathBuf]) -> Result<Dispatch> {
        self.run_with(origin, paths, |path| classify_file(path))
    }

    /// Like [`run`](Self::run) with a custom per-file job.
    pub fn run_with<F>(&self, origin: &Path, paths: &[PathBuf], job: F) -> Result<Dispatch>
    where
        F: Fn(&Path) -> Result<LineCounts> + Sync,
    {
        if paths.is_empty() {
            return Err(ClscError::NoEligibleFiles(origin.to_path_buf()));
        }

        debug!(
            "dispatching {} files with {:?}",
            paths.len(),
            self.concurrency
        );

        let slots = match self.concurrency {
            Concurrency::PerFile => scatter_threads(paths, &job)?,
            Concurrency::Pool { workers } => scatter_pool(paths, workers, &job)?,
        };

        let dispatch = gather(paths, slots, self.policy)?;
        if dispatch.records.is_empty() {
            return Err(ClscError::NoEligibleFiles(origin.to_path_buf()));
        }
        Ok(dispatch)
    }
}

fn scatter_threads<F>(paths: &[PathBuf], job: &F) -> Result<Vec<Result<LineCounts>>>
where
    F: Fn(&Path) -> Result<LineCounts> + Sync,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(paths.len());
        let mut spawn_error = None;

        for (index, path) in paths.iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("clsc-worker-{index}"))
                .spawn_scoped(scope, move || job(path));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // Join everything that was started, even when spawning stopped early.
        let slots: Vec<Result<LineCounts>> = handles
            .into_iter()
            .zip(paths)
            .map(|(handle, path)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(ClscError::WorkerPanicked(path.clone())))
            })
            .collect();

        match spawn_error {
            Some(e) => Err(ClscError::WorkerCreationFailed(e.to_string())),
            None => Ok(slots),
        }
    })
}

fn scatter_pool<F>(paths: &[PathBuf], workers: usize, job: &F) -> Result<Vec<Result<LineCounts>>>
where
    F: Fn(&Path) -> Result<LineCounts> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("clsc-worker-{index}"))
        .build()
        .map_err(|e| ClscError::WorkerCreationFailed(e.to_string()))?;

    Ok(pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                panic::catch_unwind(panic::AssertUnwindSafe(|| job(path)))
                    .unwrap_or_else(|_| Err(ClscError::WorkerPanicked(path.clone())))
            })
            .collect()
    }))
}

/// Pair each slot with its path and apply the failure policy. Under
/// [`FailurePolicy::Abort`] the first failure in path order wins.
fn gather(
    paths: &[PathBuf],
    slots: Vec<Result<LineCounts>>,
    policy: FailurePolicy,
) -> Result<Dispatch> {
    let mut dispatch = Dispatch::default();

    for (path, slot) in paths.iter().zip(slots) {
        match slot {
            Ok(counts) => dispatch.records.push(FileRecord::new(path.clone(), counts)),
            Err(err) => match policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Skip => {
                    warn!("skipping {}: {}", path.display(), err);
                    dispatch
                        .skipped
                        .push(SkippedEntry::new(path.clone(), err.to_string()));
                }
            },
        }
    }

    Ok(dispatch)
}
