//! bklst: extract 《》-bracketed book titles from EPUB/MOBI archives into a reading list.

pub mod archive;
pub mod book;
pub mod booklist;
pub mod cleanup;
pub mod cli;
pub mod finder;
pub mod scan;

// Re-exports for CLI and consumers.
pub use archive::{rename_to_zip, stage, unzip, ArchiveError};
pub use book::{Ebook, EbookFormat};
pub use booklist::{BookList, BookListError, DEFAULT_SUFFIX};
pub use cleanup::{Disposer, SystemTrash, TrashDir, TrashError};
pub use finder::{FindSummary, Finder, FinderError};
pub use scan::{extract_titles, find_documents, is_markup_document, scan_document, ScanError};
