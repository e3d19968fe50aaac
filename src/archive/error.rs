//! Errors from staging and unpacking an archive.

use std::path::PathBuf;
use thiserror::Error;

/// Staging, renaming and extraction failures. All are fatal for the run.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Invalid e-book name '{name}': cannot derive a non-empty prefix.")]
    InvalidName { name: String },

    #[error("Working directory already exists: {path}")]
    DirectoryExists { path: PathBuf },

    #[error("Permission denied creating working directory: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Cannot create working directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an e-book (expected .epub or .mobi): {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Cannot rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to extract {path}: {source}")]
    Extract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to write extracted entry {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
