//! Archive reference: the input e-book path and the names derived from it.
//!
//! The prefix (file name up to the first `.`) names both the working directory
//! and the title-list file.

use crate::archive::ArchiveError;
use std::path::{Path, PathBuf};

/// E-book container formats that are zip archives under another extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EbookFormat {
    Epub,
    Mobi,
}

impl EbookFormat {
    /// Recognize a format from a file name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        [EbookFormat::Epub, EbookFormat::Mobi]
            .into_iter()
            .find(|format| {
                name.strip_suffix(format.extension())
                    .is_some_and(|stem| stem.ends_with('.'))
            })
    }

    pub fn extension(self) -> &'static str {
        match self {
            EbookFormat::Epub => "epub",
            EbookFormat::Mobi => "mobi",
        }
    }
}

/// File name up to (not including) the first `.`.
pub fn prefix_of(name: &str) -> &str {
    name.split('.').next().unwrap_or_default()
}

/// An input e-book. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ebook {
    path: PathBuf,
    file_name: String,
    prefix: String,
    format: Option<EbookFormat>,
}

impl Ebook {
    /// Build from a path. Fails with `InvalidName` when the file name is missing,
    /// not UTF-8, or derives an empty prefix (e.g. `.epub`).
    ///
    /// An unrecognized extension is not an error here; the unpacker rejects it
    /// after staging.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ArchiveError::InvalidName {
                name: path.display().to_string(),
            })?
            .to_string();
        let prefix = prefix_of(&file_name).to_string();
        if prefix.is_empty() {
            return Err(ArchiveError::InvalidName { name: file_name });
        }
        let format = EbookFormat::from_name(&file_name);
        Ok(Ebook {
            path,
            file_name,
            prefix,
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn format(&self) -> Option<EbookFormat> {
        self.format
    }

    /// Working directory for this book under `base_dir`.
    pub fn work_dir(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.prefix)
    }

    /// Name of the zip the staged copy is renamed to.
    pub fn zip_name(&self) -> String {
        format!("{}.zip", self.prefix)
    }

    /// Title-list file name, e.g. `book.bklst`.
    pub fn list_name(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epub_derives_prefix_workdir_and_list_name() {
        let book = Ebook::new("book.epub").unwrap();
        assert_eq!(book.prefix(), "book");
        assert_eq!(book.file_name(), "book.epub");
        assert_eq!(book.format(), Some(EbookFormat::Epub));
        assert_eq!(book.work_dir(Path::new("/tmp")), PathBuf::from("/tmp/book"));
        assert_eq!(book.zip_name(), "book.zip");
        assert_eq!(book.list_name(".bklst"), "book.bklst");
    }

    #[test]
    fn prefix_stops_at_first_dot() {
        let book = Ebook::new("a.b.mobi").unwrap();
        assert_eq!(book.prefix(), "a");
        assert_eq!(book.format(), Some(EbookFormat::Mobi));
    }

    #[test]
    fn prefix_uses_file_name_not_directory() {
        let book = Ebook::new("some.dir/novel.epub").unwrap();
        assert_eq!(book.prefix(), "novel");
        assert_eq!(book.path(), Path::new("some.dir/novel.epub"));
    }

    #[test]
    fn empty_prefix_is_invalid_name() {
        assert!(matches!(
            Ebook::new(".epub"),
            Err(ArchiveError::InvalidName { .. })
        ));
    }

    #[test]
    fn unrecognized_extension_has_no_format() {
        let book = Ebook::new("notes.txt").unwrap();
        assert_eq!(book.prefix(), "notes");
        assert_eq!(book.format(), None);
    }

    #[test]
    fn format_matching_is_case_sensitive() {
        assert_eq!(EbookFormat::from_name("BOOK.EPUB"), None);
        assert_eq!(EbookFormat::from_name("x.epub"), Some(EbookFormat::Epub));
        assert_eq!(EbookFormat::Mobi.extension(), "mobi");
    }

    #[test]
    fn format_requires_dot_before_extension() {
        assert_eq!(EbookFormat::from_name("epub"), None);
        assert_eq!(EbookFormat::from_name("bookepub"), None);
        assert_eq!(EbookFormat::from_name(".mobi"), Some(EbookFormat::Mobi));
        assert_eq!(
            EbookFormat::from_name("a.b.epub"),
            Some(EbookFormat::Epub)
        );
    }

    #[test]
    fn prefix_of_without_dot_is_whole_name() {
        assert_eq!(prefix_of("README"), "README");
        assert_eq!(prefix_of(""), "");
    }
}
