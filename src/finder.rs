//! Pipeline driver: stage -> unzip -> locate -> scan -> append -> dedup -> trash.
//!
//! All paths are explicit. Nothing here changes the process working directory;
//! the CLI passes the current directory as `base_dir`.

use crate::archive::{self, ArchiveError};
use crate::book::{Ebook, EbookFormat};
use crate::booklist::{BookList, BookListError, DEFAULT_SUFFIX};
use crate::cleanup::{Disposer, TrashError};
use crate::scan::{self, ScanError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Any failure of a pipeline run. Each one aborts the run (and a batch).
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{0}")]
    Archive(#[from] ArchiveError),

    #[error("{0}")]
    Scan(#[from] ScanError),

    #[error("{0}")]
    BookList(#[from] BookListError),

    #[error("{0}")]
    Trash(#[from] TrashError),

    #[error("Refusing to write the book list over the input e-book: {path}")]
    ListIsInput { path: PathBuf },

    #[error("Cannot list e-books in {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one archive's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindSummary {
    pub archive: PathBuf,
    pub list_path: PathBuf,
    /// Files written by the extraction.
    pub entries_extracted: usize,
    pub documents_scanned: usize,
    /// Matches appended this run, duplicates included.
    pub titles_found: usize,
    /// Lines in the list after dedup; `None` when no list file exists.
    pub unique_titles: Option<usize>,
}

/// Runs the pipeline for one archive or a directory of archives.
pub struct Finder<'a> {
    base_dir: PathBuf,
    suffix: String,
    disposer: &'a dyn Disposer,
    progress: Option<&'a dyn Fn(u32, u32)>,
    on_finished: Option<&'a dyn Fn(&FindSummary)>,
}

impl<'a> Finder<'a> {
    /// Working directories and list files are created under `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>, disposer: &'a dyn Disposer) -> Self {
        Finder {
            base_dir: base_dir.into(),
            suffix: DEFAULT_SUFFIX.to_string(),
            disposer,
            progress: None,
            on_finished: None,
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Called with `(documents_done, documents_total)`, starting at 0 for each archive.
    pub fn progress(mut self, progress: &'a dyn Fn(u32, u32)) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Called after each archive's run succeeds, before the next one starts.
    pub fn on_finished(mut self, on_finished: &'a dyn Fn(&FindSummary)) -> Self {
        self.on_finished = Some(on_finished);
        self
    }

    /// Run the full pipeline for one archive.
    ///
    /// On error the working directory is left where it is.
    pub fn run(&self, archive_path: &Path) -> Result<FindSummary, FinderError> {
        let ebook = Ebook::new(archive_path)?;
        let work_dir = ebook.work_dir(&self.base_dir);
        let list = BookList::for_prefix(&self.base_dir, ebook.prefix(), &self.suffix);
        if same_file(list.path(), ebook.path()) {
            return Err(FinderError::ListIsInput {
                path: ebook.path().to_path_buf(),
            });
        }

        let staged = archive::stage(&ebook, &work_dir)?;
        let zip_path = archive::rename_to_zip(&staged, &ebook)?;
        let entries_extracted = archive::unzip(&zip_path, &work_dir)?;

        let documents = scan::find_documents(&work_dir)?;
        debug!(count = documents.len(), "located markup documents");
        let total = documents.len() as u32;
        self.report(0, total);

        let mut titles_found = 0;
        for (i, doc) in documents.iter().enumerate() {
            let titles = scan::scan_document(doc)?;
            if !titles.is_empty() {
                debug!(document = %doc.display(), titles = titles.len(), "found titles");
                titles_found += titles.len();
                list.append(&titles)?;
            }
            self.report(i as u32 + 1, total);
        }

        let unique_titles = list.dedup()?;
        self.disposer.dispose(&work_dir)?;

        info!(
            archive = %archive_path.display(),
            documents = documents.len(),
            titles_found,
            unique = unique_titles.unwrap_or(0),
            "finished archive"
        );
        let summary = FindSummary {
            archive: archive_path.to_path_buf(),
            list_path: list.path().to_path_buf(),
            entries_extracted,
            documents_scanned: documents.len(),
            titles_found,
            unique_titles,
        };
        if let Some(cb) = self.on_finished {
            cb(&summary);
        }
        Ok(summary)
    }

    /// Run the pipeline for every e-book in `dir`, in name order.
    ///
    /// The first failure aborts the batch; archives already processed keep their output.
    pub fn run_all(&self, dir: &Path) -> Result<Vec<FindSummary>, FinderError> {
        let ebooks = list_ebooks(dir)?;
        debug!(dir = %dir.display(), count = ebooks.len(), "batch mode");
        ebooks.iter().map(|path| self.run(path)).collect()
    }

    fn report(&self, done: u32, total: u32) {
        if let Some(cb) = self.progress {
            cb(done, total);
        }
    }
}

/// True when both paths name the same file. The list file may not exist yet,
/// so parents are canonicalized and file names compared.
fn same_file(a: &Path, b: &Path) -> bool {
    let resolve = |p: &Path| -> Option<PathBuf> {
        let parent = match p.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        Some(parent.canonicalize().ok()?.join(p.file_name()?))
    };
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Regular files in `dir` whose names end in `.epub` or `.mobi`, sorted by name.
pub fn list_ebooks(dir: &Path) -> Result<Vec<PathBuf>, FinderError> {
    let list_err = |e| FinderError::ListDir {
        path: dir.to_path_buf(),
        source: e,
    };
    let mut ebooks = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        let is_ebook = entry
            .file_name()
            .to_str()
            .and_then(EbookFormat::from_name)
            .is_some();
        if is_ebook && path.is_file() {
            ebooks.push(path);
        }
    }
    ebooks.sort();
    Ok(ebooks)
}
