//! Fixture helpers for craft's integration tests, playing the role
//! `cargo-test-support` plays for cargo: build a throwaway project tree on
//! disk, then drive the tool against it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

/// Start building a temporary project tree.
pub fn project() -> ProjectBuilder {
    ProjectBuilder {
        dir: tempfile::tempdir().expect("failed to create temp dir for test project"),
        files: Vec::new(),
    }
}

pub struct ProjectBuilder {
    dir: TempDir,
    files: Vec<(PathBuf, String)>,
}

impl ProjectBuilder {
    /// Queue a file to be written relative to the project root.
    pub fn file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), contents.into()));
        self
    }

    /// Write every queued file to disk and return the finished project.
    pub fn build(self) -> Project {
        for (path, contents) in &self.files {
            let full = self.dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).expect("failed to create test project directory");
            }
            fs::write(&full, contents).expect("failed to write test project file");
        }
        Project { dir: self.dir }
    }
}

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file_contents(&self, rel: impl AsRef<Path>) -> String {
        fs::read_to_string(self.join(rel)).expect("failed to read test project file")
    }

    pub fn write_file(&self, rel: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
        let full = self.join(rel);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("failed to create test project directory");
        }
        fs::write(full, contents).expect("failed to write test project file");
    }
}

/// Push every file under `root` an hour into the past, the way
/// `cargo-test-support`'s `move_into_the_past` lets a test assert that a
/// subsequent touch of a single file is what triggers a rebuild.
pub fn move_into_the_past(root: &Path) -> io::Result<()> {
    let past = FileTime::from_system_time(SystemTime::now() - Duration::from_secs(3600));
    visit(root, &mut |path| filetime::set_file_mtime(path, past))
}

fn visit(path: &Path, f: &mut impl FnMut(&Path) -> io::Result<()>) -> io::Result<()> {
    if path.is_dir() {
        for entry in fs::read_dir(path)? {
            visit(&entry?.path(), f)?;
        }
    }
    f(path)
}

/// Sleep long enough that a fresh mtime is guaranteed to differ from a
/// previous one even on filesystems with whole-second resolution.
pub fn sleep_past_mtime_granularity() {
    std::thread::sleep(Duration::from_millis(1100));
}
