//! Error types for clsclib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering and counting files
#[derive(Error, Debug)]
pub enum ClscError {
    /// Path is neither a regular file nor a directory
    #[error("invalid path '{0}': not a file or directory")]
    InvalidPath(PathBuf),

    /// A regular file was given that does not carry the source extension
    #[error("not a '.{extension}' source file: {path}")]
    NotSourceFile { path: PathBuf, extension: String },

    /// Failed to open or read a directory
    #[error("failed to open directory '{path}': {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to open or read a file
    #[error("failed to open file '{path}': {source}")]
    FileUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Nothing to count under the given path
    #[error("no eligible source files found in '{0}'")]
    NoEligibleFiles(PathBuf),

    /// Threads or the thread pool could not be created
    #[error("failed to create worker: {0}")]
    WorkerCreationFailed(String),

    /// A worker panicked while counting a file
    #[error("worker panicked while counting '{0}'")]
    WorkerPanicked(PathBuf),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn messages_name_the_path() {
        let err = ClscError::FileUnreadable {
            path: PathBuf::from("src/main.c"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("src/main.c"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn no_eligible_files_mentions_path() {
        let err = ClscError::NoEligibleFiles(PathBuf::from("empty"));
        assert_eq!(err.to_string(), "no eligible source files found in 'empty'");
    }

    #[test]
    fn worker_creation_carries_reason() {
        let err = ClscError::WorkerCreationFailed("out of threads".into());
        assert_eq!(err.to_string(), "failed to create worker: out of threads");
    }
}
