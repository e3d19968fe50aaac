//! Recoverable deletion of working directories.
//!
//! [`SystemTrash`] hands the directory to the platform trash / recycle bin.
//! [`TrashDir`] moves it into an app-level trash folder instead, which is what
//! `--trash-dir` selects and what the tests use.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("Cannot move {path} to the system trash: {source}")]
    System {
        path: PathBuf,
        #[source]
        source: trash::Error,
    },

    #[error("Cannot create trash directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot move {from} to {to}: {source}")]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot trash {path}: path has no file name.")]
    NoFileName { path: PathBuf },
}

/// Discards a working directory once a pipeline run has succeeded.
pub trait Disposer {
    fn dispose(&self, dir: &Path) -> Result<(), TrashError>;
}

/// Platform trash via the `trash` crate (freedesktop trash, macOS Trash, Windows Recycle Bin).
///
/// Not exercised by the unit tests, which would otherwise fill the real trash
/// of whoever runs them; they use [`TrashDir`] instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

impl Disposer for SystemTrash {
    fn dispose(&self, dir: &Path) -> Result<(), TrashError> {
        trash::delete(dir).map_err(|e| TrashError::System {
            path: dir.to_path_buf(),
            source: e,
        })?;
        debug!(path = %dir.display(), "moved to system trash");
        Ok(())
    }
}

/// App-level trash: each disposed directory lands in `<root>/<unix-millis>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashDir {
    root: PathBuf,
}

impl TrashDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        TrashDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A fresh, not-yet-existing entry directory under the root.
    fn entry_dir(&self) -> PathBuf {
        let millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let mut candidate = self.root.join(millis.to_string());
        let mut counter = 1;
        while candidate.exists() {
            candidate = self.root.join(format!("{}-{}", millis, counter));
            counter += 1;
        }
        candidate
    }
}

impl Disposer for TrashDir {
    fn dispose(&self, dir: &Path) -> Result<(), TrashError> {
        let name = dir.file_name().ok_or_else(|| TrashError::NoFileName {
            path: dir.to_path_buf(),
        })?;
        let entry = self.entry_dir();
        fs::create_dir_all(&entry).map_err(|e| TrashError::CreateDir {
            path: entry.clone(),
            source: e,
        })?;
        let dest = entry.join(name);
        fs::rename(dir, &dest).map_err(|e| TrashError::Move {
            from: dir.to_path_buf(),
            to: dest.clone(),
            source: e,
        })?;
        debug!(from = %dir.display(), to = %dest.display(), "moved to trash directory");
        Ok(())
    }
}
