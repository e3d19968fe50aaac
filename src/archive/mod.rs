//! Archive staging and unpacking. Copies the e-book into its working directory,
//! renames it to `.zip`, and extracts every entry in place.

mod error;

pub use error::ArchiveError;

use crate::book::Ebook;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Create `work_dir` and copy the e-book into it under its original name.
///
/// `work_dir` must not exist. Returns the path of the staged copy.
pub fn stage(ebook: &Ebook, work_dir: &Path) -> Result<PathBuf, ArchiveError> {
    fs::create_dir(work_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => ArchiveError::DirectoryExists {
            path: work_dir.to_path_buf(),
        },
        io::ErrorKind::PermissionDenied => ArchiveError::PermissionDenied {
            path: work_dir.to_path_buf(),
        },
        _ => ArchiveError::CreateDir {
            path: work_dir.to_path_buf(),
            source: e,
        },
    })?;

    let staged = work_dir.join(ebook.file_name());
    fs::copy(ebook.path(), &staged).map_err(|e| ArchiveError::Copy {
        from: ebook.path().to_path_buf(),
        to: staged.clone(),
        source: e,
    })?;
    debug!(from = %ebook.path().display(), to = %staged.display(), "staged e-book");
    Ok(staged)
}

/// Rename the staged copy to `<prefix>.zip` next to it.
///
/// Fails with `UnsupportedFormat` (and leaves the file untouched) when the
/// e-book is neither `.epub` nor `.mobi`.
pub fn rename_to_zip(staged: &Path, ebook: &Ebook) -> Result<PathBuf, ArchiveError> {
    if ebook.prefix().is_empty() {
        return Err(ArchiveError::InvalidName {
            name: ebook.file_name().to_string(),
        });
    }
    if ebook.format().is_none() {
        return Err(ArchiveError::UnsupportedFormat {
            path: staged.to_path_buf(),
        });
    }
    let dir = staged.parent().unwrap_or_else(|| Path::new(""));
    let zip_path = dir.join(ebook.zip_name());
    fs::rename(staged, &zip_path).map_err(|e| ArchiveError::Rename {
        from: staged.to_path_buf(),
        to: zip_path.clone(),
        source: e,
    })?;
    Ok(zip_path)
}

/// Extract every entry of `zip_path` into `dest`. Returns the number of files written.
///
/// Entries that would land outside `dest` are skipped. Any zip error aborts
/// the extraction; files already written stay on disk.
pub fn unzip(zip_path: &Path, dest: &Path) -> Result<usize, ArchiveError> {
    let file = fs::File::open(zip_path).map_err(|e| ArchiveError::Open {
        path: zip_path.to_path_buf(),
        source: e,
    })?;
    let extract_err = |e| ArchiveError::Extract {
        path: zip_path.to_path_buf(),
        source: e,
    };
    let mut archive = zip::ZipArchive::new(file).map_err(extract_err)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(extract_err)?;
        let Some(rel) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "skipping zip entry with unsafe path");
            continue;
        };
        let out_path = dest.join(rel);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| ArchiveError::Write {
                path: out_path.clone(),
                source: e,
            })?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let mut out = fs::File::create(&out_path).map_err(|e| ArchiveError::Write {
            path: out_path.clone(),
            source: e,
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::Write {
            path: out_path.clone(),
            source: e,
        })?;
        count += 1;
    }
    debug!(archive = %zip_path.display(), files = count, "extracted archive");
    Ok(count)
}

/// Write a zip at `path` with the given `(name, contents)` entries.
#[cfg(test)]
pub(crate) fn write_test_archive(
    path: &Path,
    entries: &[(&str, &str)],
) -> zip::result::ZipResult<()> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let file = fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, contents) in entries {
        zip.start_file(*name, options)?;
        zip.write_all(contents.as_bytes())?;
    }
    zip.finish()?;
    Ok(())
}
