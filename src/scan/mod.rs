//! Document location and title scanning.

mod error;
mod locate;

pub use error::ScanError;
pub use locate::{find_documents, is_markup_document};

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// A title is anything between 《 and 》 on one line, brackets included.
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"《.*?》").expect("valid title regex"));

/// All bracketed titles in `text`, left to right, duplicates kept.
pub fn extract_titles(text: &str) -> Vec<&str> {
    TITLE_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Read a document as UTF-8 and return its titles.
pub fn scan_document(path: &Path) -> Result<Vec<String>, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|e| ScanError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(extract_titles(&text)
        .into_iter()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn extract_titles_keeps_order_and_duplicates() {
        let text = "<p>See 《A》 and again 《A》, then 《B》.</p>";
        assert_eq!(extract_titles(text), vec!["《A》", "《A》", "《B》"]);
    }

    #[test]
    fn extract_titles_is_non_greedy() {
        assert_eq!(
            extract_titles("《Title One》 and 《Title Two》"),
            vec!["《Title One》", "《Title Two》"]
        );
    }

    #[test]
    fn extract_titles_does_not_span_lines() {
        assert!(extract_titles("《broken\ntitle》").is_empty());
        assert_eq!(extract_titles("《x\n《y》"), vec!["《y》"]);
    }

    #[test]
    fn extract_titles_none() {
        assert!(extract_titles("<p>No titles here.</p>").is_empty());
        assert!(extract_titles("").is_empty());
    }

    #[test]
    fn extract_titles_empty_brackets() {
        assert_eq!(extract_titles("《》"), vec!["《》"]);
    }

    #[test]
    fn scan_document_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ch1.xhtml");
        std::fs::write(&path, "<p>读《红楼梦》和《西游记》</p>").unwrap();
        assert_eq!(
            scan_document(&path).unwrap(),
            vec!["《红楼梦》".to_string(), "《西游记》".to_string()]
        );
    }

    #[test]
    fn scan_document_invalid_utf8_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.html");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        assert!(matches!(scan_document(&path), Err(ScanError::Read { .. })));
    }

    #[test]
    fn scan_document_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan_document(&tmp.path().join("missing.html"));
        assert!(matches!(result, Err(ScanError::Read { .. })));
    }
}
