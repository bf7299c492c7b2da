//! Input options for counting.
//!
//! This module contains the configuration types that control how files are
//! discovered, how work is spread across threads, and what happens when an
//! entry cannot be read.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::filter::FilterConfig;

/// How per-file work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Concurrency {
    /// One OS thread per file, all joined before aggregation
    PerFile,
    /// Bounded pool; `workers == 0` sizes the pool to the available CPUs
    Pool { workers: usize },
}

impl Default for Concurrency {
    fn default() -> Self {
        Concurrency::Pool { workers: 0 }
    }
}

/// What to do when a file or nested directory cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Stop the whole run on the first unreadable entry
    #[default]
    Abort,
    /// Log the entry, list it as skipped, and keep going
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" | "fail" => Ok(FailurePolicy::Abort),
            "skip" | "continue" => Ok(FailurePolicy::Skip),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

/// Options for counting lines.
#[derive(Debug, Clone, Default)]
pub struct CountOptions {
    /// File eligibility rules
    pub filter: FilterConfig,
    /// Scheduling of per-file work
    pub concurrency: Concurrency,
    /// Handling of unreadable entries
    pub failure_policy: FailurePolicy,
    /// Whether to keep per-file records in the result
    pub per_file_stats: bool,
}

impl CountOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set the concurrency mode.
    pub fn concurrency(mut self, concurrency: Concurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the failure policy.
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Include per-file records in results.
    pub fn with_file_stats(mut self) -> Self {
        self.per_file_stats = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let options = CountOptions::new();
        assert_eq!(options.failure_policy, FailurePolicy::Abort);
        assert_eq!(options.concurrency, Concurrency::Pool { workers: 0 });
        assert!(!options.per_file_stats);
        assert_eq!(options.filter.extension(), "c");
    }

    #[test]
    fn builder_sets_fields() {
        let options = CountOptions::new()
            .concurrency(Concurrency::PerFile)
            .failure_policy(FailurePolicy::Skip)
            .with_file_stats();

        assert_eq!(options.concurrency, Concurrency::PerFile);
        assert_eq!(options.failure_policy, FailurePolicy::Skip);
        assert!(options.per_file_stats);
    }

    #[test]
    fn failure_policy_from_str() {
        assert_eq!("skip".parse::<FailurePolicy>(), Ok(FailurePolicy::Skip));
        assert_eq!("ABORT".parse::<FailurePolicy>(), Ok(FailurePolicy::Abort));
        assert!("maybe".parse::<FailurePolicy>().is_err());
    }
}
