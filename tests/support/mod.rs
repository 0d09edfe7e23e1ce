#![allow(dead_code)]

pub mod pipeline;

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Write `contents` to a file named `name` inside a fresh temporary directory.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    (dir, path)
}

/// Path for a SQLite database inside a fresh temporary directory.
pub fn temp_db_path() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("quota.db").to_string_lossy().into_owned();
    (dir, path)
}
