//! File utility functions for listing directory contents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Returns paths to all regular files directly inside `dir`, sorted by name.
/// Subdirectories are not descended into.
pub fn list_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

/// Returns the final path component as UTF-8, if it has one.
pub fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
