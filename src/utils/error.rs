//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while discovering or loading site documents
///
/// Every per-document variant carries the offending path so a broken
/// upload can be traced back to its site.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed site document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Site document {path} has no \"cohort_groups\" object")]
    MissingCohortGroups { path: PathBuf },

    #[error("Failed to scan input directory: {0}")]
    Discovery(#[from] walkdir::Error),
}

/// Errors that can occur during table output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Failed to move staged table into place at {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
