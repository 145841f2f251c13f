//! File placement: duplicate a classified image into its category folder.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ItemError;

use super::discovery::ImageRecord;

/// Copies classified images into per-category destination folders.
pub struct FileSorter;

impl FileSorter {
    /// Place `record` under `dest_root/category_id/`, keeping its name.
    ///
    /// The category folder is created if missing (idempotent). The file is
    /// copied, never moved, and a same-name file at the destination is
    /// silently overwritten. Source timestamps are carried over where the
    /// platform allows; timestamp failures are logged, not fatal.
    pub fn place(
        record: &ImageRecord,
        category_id: &str,
        dest_root: &Path,
    ) -> Result<PathBuf, ItemError> {
        let category_dir = dest_root.join(category_id);
        fs::create_dir_all(&category_dir).map_err(|e| ItemError::Io {
            path: category_dir.clone(),
            source: e,
        })?;

        let dest = category_dir.join(&record.file_name);
        fs::copy(&record.path, &dest).map_err(|e| ItemError::Io {
            path: record.path.clone(),
            source: e,
        })?;

        if let Err(e) = Self::copy_times(&record.path, &dest) {
            tracing::debug!("Could not preserve timestamps for {:?}: {}", dest, e);
        }

        Ok(dest)
    }

    /// Best-effort transfer of modified/accessed timestamps.
    fn copy_times(source: &Path, dest: &Path) -> std::io::Result<()> {
        let meta = fs::metadata(source)?;
        let mut times = fs::FileTimes::new();
        if let Ok(modified) = meta.modified() {
            times = times.set_modified(modified);
        }
        if let Ok(accessed) = meta.accessed() {
            times = times.set_accessed(accessed);
        }
        fs::File::options()
            .write(true)
            .open(dest)?
            .set_times(times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dir: &Path, name: &str, contents: &[u8]) -> ImageRecord {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        ImageRecord {
            path,
            file_name: name.to_string(),
        }
    }

    #[test]
    fn test_place_creates_category_folder_and_copies() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let rec = record(src.path(), "a.jpg", b"payload");

        let placed = FileSorter::place(&rec, "طعام", dst.path()).unwrap();
        assert_eq!(placed, dst.path().join("طعام").join("a.jpg"));
        assert_eq!(fs::read(&placed).unwrap(), b"payload");
        // Source still exists: copy, not move.
        assert!(rec.path.exists());
    }

    #[test]
    fn test_place_is_idempotent_on_existing_folder() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        fs::create_dir_all(dst.path().join("حيوانات")).unwrap();
        let rec = record(src.path(), "b.png", b"x");

        assert!(FileSorter::place(&rec, "حيوانات", dst.path()).is_ok());
    }

    #[test]
    fn test_place_overwrites_same_name() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let old = record(src.path(), "c.jpg", b"old");
        FileSorter::place(&old, "أخرى", dst.path()).unwrap();

        let new = record(src.path(), "c.jpg", b"new");
        let placed = FileSorter::place(&new, "أخرى", dst.path()).unwrap();

        assert_eq!(fs::read(&placed).unwrap(), b"new");
        // Exactly one copy of the name exists.
        let count = fs::read_dir(dst.path().join("أخرى")).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_place_missing_source_is_io_error() {
        let dst = tempfile::tempdir().unwrap();
        let rec = ImageRecord {
            path: PathBuf::from("/nonexistent/gone.jpg"),
            file_name: "gone.jpg".to_string(),
        };

        let result = FileSorter::place(&rec, "أخرى", dst.path());
        assert!(matches!(result, Err(ItemError::Io { .. })));
    }
}
