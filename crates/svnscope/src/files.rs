//! Working-copy file listing

use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// Directory names never descended into
pub const SKIPPED_DIRS: &[&str] = &[".svn", "node_modules"];

/// One regular file found under a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Path relative to the listed root, `/`-separated
    pub path: String,
    /// Absolute path on disk
    pub full_path: String,
}

/// Recursively list every non-directory entry under `root`.
///
/// Entries named like svn metadata or dependency caches are skipped along
/// with everything below them. Symlinks are followed. Results are ordered
/// by file name within each directory.
///
/// # Errors
///
/// Returns the first walk error (missing root, unreadable directory, link
/// loop).
pub fn list_files(root: &Path) -> Result<Vec<FileEntry>, walkdir::Error> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.file_name()
                .to_str()
                .is_none_or(|name| !SKIPPED_DIRS.contains(&name))
        });

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(FileEntry {
            path,
            full_path: entry.path().display().to_string(),
        });
    }

    Ok(files)
}
