//! Error types for record loading.

use std::path::PathBuf;

/// Errors that can occur while loading game records.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A required data directory does not exist.
    #[error("{kind} directory not found: {}", path.display())]
    MissingDirectory {
        /// Which records the directory holds.
        kind: &'static str,
        /// The path that was looked up.
        path: PathBuf,
    },

    /// A required directory held no loadable records.
    #[error("no {kind} found to load")]
    Empty {
        /// Which records were expected.
        kind: &'static str,
    },

    /// Reading a directory or file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record file is not valid JSON for its record kind.
    #[error("failed to parse JSON in {}: {source}", path.display())]
    Json {
        /// The record file.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A record file name does not follow the expected pattern.
    #[error("invalid file name {}: expected {expected}", path.display())]
    FileName {
        /// The record file.
        path: PathBuf,
        /// Description of the expected pattern.
        expected: &'static str,
    },
}
