//! File discovery for finding images in the source directory.
//!
//! Scanning is non-recursive: only regular files directly inside the source
//! directory qualify. Enumeration order is whatever the filesystem returns;
//! callers must not assume any particular ordering, only that the listing is
//! exhaustive at scan time.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ScanConfig;
use crate::error::RunError;

/// One image discovered at scan time. Ephemeral: lives for the duration of
/// one classify-and-sort step.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Full path to the file
    pub path: PathBuf,
    /// Bare file name, reused at the destination
    pub file_name: String,
}

/// Discovers image files in a source directory.
pub struct FileDiscovery {
    config: ScanConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Enumerate qualifying image files directly inside `source_dir`.
    ///
    /// An unreadable directory (removed or permission-denied mid-scan) is a
    /// run-aborting error, not a per-item one.
    pub fn scan(&self, source_dir: &Path) -> Result<Vec<ImageRecord>, RunError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(source_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| RunError::Scan {
                path: source_dir.to_path_buf(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_supported(path) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!("Skipping file with non-UTF8 name: {:?}", path);
                continue;
            };
            files.push(ImageRecord {
                path: path.to_path_buf(),
                file_name: file_name.to_string(),
            });
        }

        Ok(files)
    }

    /// Check if a file has a supported extension (case-insensitive).
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.config
                    .extensions
                    .iter()
                    .any(|fmt| fmt.to_lowercase() == ext_lower)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discovery() -> FileDiscovery {
        FileDiscovery::new(ScanConfig::default())
    }

    #[test]
    fn test_is_supported() {
        let d = discovery();
        assert!(d.is_supported(Path::new("test.jpg")));
        assert!(d.is_supported(Path::new("test.JPG")));
        assert!(d.is_supported(Path::new("test.jpeg")));
        assert!(d.is_supported(Path::new("test.png")));
        assert!(d.is_supported(Path::new("test.bmp")));
        assert!(d.is_supported(Path::new("test.GIF")));
        assert!(!d.is_supported(Path::new("test.webp")));
        assert!(!d.is_supported(Path::new("test.txt")));
        assert!(!d.is_supported(Path::new("noextension")));
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        std::fs::write(dir.path().join("b.PNG"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let files = discovery().scan(dir.path()).unwrap();
        let mut names: Vec<_> = files.iter().map(|f| f.file_name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["a.jpg", "b.PNG"]);
    }

    #[test]
    fn test_scan_is_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("deep.jpg"), b"x").unwrap();

        let files = discovery().scan(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name, "top.jpg");
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let files = discovery().scan(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_missing_directory_is_run_error() {
        let result = discovery().scan(Path::new("/nonexistent/source"));
        assert!(matches!(result, Err(RunError::Scan { .. })));
    }

    #[test]
    fn test_scan_ignores_directories_with_image_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.jpg")).unwrap();

        let files = discovery().scan(dir.path()).unwrap();
        assert!(files.is_empty());
    }
}
