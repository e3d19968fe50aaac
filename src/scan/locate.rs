//! Document locator: finds markup documents under an extracted tree.

use super::ScanError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKUP_EXTENSIONS: [&str; 3] = [".html", ".xhtml", ".htm"];

/// True when `name` ends in `.html`, `.xhtml` or `.htm` (case-sensitive).
pub fn is_markup_document(name: &str) -> bool {
    MARKUP_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Every markup document beneath `root`, recursively, each listed once.
///
/// Paths are `root` joined with the relative path. Entries are sorted by file
/// name within each directory.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScanError::Walk {
            root: root.to_path_buf(),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_doc = entry
            .file_name()
            .to_str()
            .map(is_markup_document)
            .unwrap_or(false);
        if is_doc {
            documents.push(entry.into_path());
        }
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn markup_extensions() {
        assert!(is_markup_document("ch1.html"));
        assert!(is_markup_document("ch1.xhtml"));
        assert!(is_markup_document("ch1.htm"));
        assert!(!is_markup_document("content.opf"));
        assert!(!is_markup_document("style.css"));
        assert!(!is_markup_document("CH1.HTML"));
        assert!(!is_markup_document("html"));
    }

    #[test]
    fn finds_documents_at_every_depth() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        touch(root, "index.html");
        touch(root, "OEBPS/ch1.xhtml");
        touch(root, "OEBPS/text/deep/ch2.htm");
        touch(root, "OEBPS/content.opf");
        touch(root, "book.zip");
        touch(root, "META-INF/container.xml");

        let docs = find_documents(root).unwrap();
        let rel: Vec<PathBuf> = docs
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("OEBPS/ch1.xhtml"),
                PathBuf::from("OEBPS/text/deep/ch2.htm"),
                PathBuf::from("index.html"),
            ]
        );
    }

    #[test]
    fn each_document_listed_once() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.html");
        touch(tmp.path(), "sub/b.html");
        let docs = find_documents(tmp.path()).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn directory_named_like_document_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("chapters.html")).unwrap();
        touch(tmp.path(), "chapters.html/real.xhtml");
        let docs = find_documents(tmp.path()).unwrap();
        assert_eq!(docs, vec![tmp.path().join("chapters.html/real.xhtml")]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(find_documents(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_walk_error() {
        let tmp = TempDir::new().unwrap();
        let result = find_documents(&tmp.path().join("missing"));
        assert!(matches!(result, Err(ScanError::Walk { .. })));
    }
}
