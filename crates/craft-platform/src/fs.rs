//! Filesystem primitives: existence, modification time, directory creation.
//!
//! Mtime comparisons across the workspace use [`filetime::FileTime`], which
//! normalizes to whole-second resolution on platforms that don't expose
//! anything finer — matching the staleness analysis in spec.md §4.2.

use std::io;
use std::path::{Path, PathBuf};

pub use filetime::FileTime;

/// `None` stands for "file does not exist" (a null mtime in spec.md's terms).
pub fn modification_time(path: &Path) -> Option<FileTime> {
    std::fs::metadata(path)
        .ok()
        .map(|meta| FileTime::from_last_modification_time(&meta))
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Recursively create `path` if it doesn't already exist.
///
/// Returns `true` if the directory (or any ancestor) had to be created,
/// `false` if it already existed. Callers use this to implement spec.md
/// §4.2's "freshly created parent directory implies staleness" rule.
pub fn create_directories(path: &Path) -> io::Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    std::fs::create_dir_all(path)?;
    Ok(true)
}

/// Directory containing `path`, as the empty path is the directory doesn't
/// have a separator component.
pub fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Replace `path`'s extension the way spec.md §8 property 10 describes:
/// the file's own extension (the last `.` after its last path separator)
/// is replaced; dots inside directory components are not extensions.
///
/// `Path::with_extension` already has exactly this semantics since it
/// operates on the file-name component alone, so this is a thin,
/// documented wrapper rather than a hand-rolled parser.
pub fn replace_extension(path: &Path, new_ext: &str) -> PathBuf {
    if new_ext.is_empty() {
        path.with_extension("")
    } else {
        path.with_extension(new_ext)
    }
}

pub fn current_dir() -> io::Result<PathBuf> {
    std::env::current_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_extension_ignores_dots_in_directories() {
        let out = replace_extension(Path::new("a/b.c/d"), "o");
        assert_eq!(out, PathBuf::from("a/b.c/d.o"));
    }

    #[test]
    fn replace_extension_to_empty_strips_extension() {
        let out = replace_extension(Path::new("build/release/app.exe"), "");
        assert_eq!(out, PathBuf::from("build/release/app"));
    }

    #[test]
    fn missing_file_has_no_modification_time() {
        assert!(modification_time(Path::new("/nonexistent/path/for/craft/tests")).is_none());
    }

    #[test]
    fn create_directories_reports_freshness() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        assert!(create_directories(&nested).unwrap());
        assert!(!create_directories(&nested).unwrap());
    }
}
