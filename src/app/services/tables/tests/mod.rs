//! Tests for the table readers and writers

use std::path::PathBuf;
use tempfile::TempDir;

pub mod assignments_tests;
pub mod output_tests;

/// Write a fixture file into a temporary directory and return its path
pub fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write test fixture");
    path
}
