//! Title-list file: one title per line, appended during scanning and collapsed
//! to unique lines (first occurrence wins) once scanning is done.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default title-list suffix: `book.epub` produces `book.bklst`.
pub const DEFAULT_SUFFIX: &str = ".bklst";

/// Errors from reading or writing the title list.
#[derive(Debug, Error)]
pub enum BookListError {
    #[error("Cannot open book list {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write book list {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read book list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Handle on a title-list file. The file may not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookList {
    path: PathBuf,
}

impl BookList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BookList { path: path.into() }
    }

    /// `<base_dir>/<prefix><suffix>`.
    pub fn for_prefix(base_dir: &Path, prefix: &str, suffix: &str) -> Self {
        BookList::new(base_dir.join(format!("{}{}", prefix, suffix)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Append titles, one per line, without checking for duplicates.
    /// Does nothing (and creates no file) when `titles` is empty.
    pub fn append<S: AsRef<str>>(&self, titles: &[S]) -> Result<(), BookListError> {
        if titles.is_empty() {
            return Ok(());
        }
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BookListError::Open {
                path: self.path.clone(),
                source: e,
            })?;
        let mut buf = String::new();
        for title in titles {
            buf.push_str(title.as_ref());
            buf.push('\n');
        }
        f.write_all(buf.as_bytes()).map_err(|e| self.write_err(e))
    }

    /// Current lines, newline stripped. Empty when the file does not exist.
    pub fn read_titles(&self) -> Result<Vec<String>, BookListError> {
        if !self.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| BookListError::Read {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(content.split_terminator('\n').map(str::to_string).collect())
    }

    /// Rewrite the file keeping only the first occurrence of each line, in order.
    ///
    /// Returns `None` without touching anything when the file does not exist,
    /// otherwise the number of unique titles written.
    pub fn dedup(&self) -> Result<Option<usize>, BookListError> {
        if !self.exists() {
            return Ok(None);
        }
        let titles = self.read_titles()?;
        let unique = unique_in_order(&titles);

        let mut f = File::create(&self.path).map_err(|e| BookListError::Open {
            path: self.path.clone(),
            source: e,
        })?;
        for title in &unique {
            writeln!(f, "{}", title).map_err(|e| self.write_err(e))?;
        }
        Ok(Some(unique.len()))
    }

    fn write_err(&self, source: io::Error) -> BookListError {
        BookListError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Distinct values in first-occurrence order.
fn unique_in_order(titles: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    titles
        .iter()
        .map(String::as_str)
        .filter(|t| seen.insert(*t))
        .collect()
}
