#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory with its own scheme store, cleaned up on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates an empty workspace with an empty `schemes/` directory.
    pub fn new() -> Self {
        let workspace = Self {
            temp_dir: tempdir().expect("temp dir"),
        };
        fs::create_dir_all(workspace.schemes_dir()).expect("create schemes dir");
        workspace
    }

    /// Creates a workspace whose store holds a copy of every fixture scheme.
    pub fn with_fixture_schemes() -> Self {
        let workspace = Self::new();
        for entry in fs::read_dir(fixture_path("schemes")).expect("fixture schemes") {
            let path = entry.expect("fixture entry").path();
            let target = workspace
                .schemes_dir()
                .join(path.file_name().expect("file name"));
            fs::copy(&path, target).expect("copy fixture scheme");
        }
        workspace
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn schemes_dir(&self) -> PathBuf {
        self.temp_dir.path().join("schemes")
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
