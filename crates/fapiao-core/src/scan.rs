//! Discovering candidate documents in the input folder.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StartupError;

/// Whether a file name has a `.pdf` suffix, ignoring case.
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// List PDF files directly inside `dir`.
///
/// Order is the directory listing order unless `sort` is set, in which
/// case paths are sorted lexicographically. An empty result is an error.
pub fn scan_candidates(dir: &Path, sort: bool) -> Result<Vec<PathBuf>, StartupError> {
    if !dir.is_dir() {
        return Err(StartupError::MissingInputDir {
            path: dir.to_path_buf(),
        });
    }

    let scan_error = |source: std::io::Error| StartupError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(scan_error)? {
        let path = entry.map_err(scan_error)?.path();

        let is_pdf = path
            .file_name()
            .map(|n| is_pdf_name(&n.to_string_lossy()))
            .unwrap_or(false);

        if is_pdf && path.is_file() {
            debug!("Found document: {}", path.display());
            candidates.push(path);
        }
    }

    if candidates.is_empty() {
        return Err(StartupError::NoCandidates {
            path: dir.to_path_buf(),
        });
    }

    if sort {
        candidates.sort();
    }

    info!("Found {} PDF files in {}", candidates.len(), dir.display());
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_pdf_name() {
        assert!(is_pdf_name("a.pdf"));
        assert!(is_pdf_name("B.PDF"));
        assert!(is_pdf_name("发票.Pdf"));
        assert!(!is_pdf_name("a.pdf.txt"));
        assert!(!is_pdf_name("pdf"));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.pdf", "a.PDF", "b.Pdf", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.pdf")).unwrap();

        let found = scan_candidates(dir.path(), true).unwrap();
        assert_eq!(
            found,
            vec![
                dir.path().join("a.PDF"),
                dir.path().join("b.Pdf"),
                dir.path().join("c.pdf"),
            ]
        );
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("deep.pdf"), b"x").unwrap();
        std::fs::write(dir.path().join("top.pdf"), b"x").unwrap();

        let found = scan_candidates(dir.path(), false).unwrap();
        assert_eq!(found, vec![dir.path().join("top.pdf")]);
    }

    #[test]
    fn test_empty_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.txt"), b"x").unwrap();

        let err = scan_candidates(dir.path(), false).unwrap_err();
        assert!(matches!(err, StartupError::NoCandidates { .. }));
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = scan_candidates(&dir.path().join("invoices"), false).unwrap_err();
        assert!(matches!(err, StartupError::MissingInputDir { .. }));
    }
}
