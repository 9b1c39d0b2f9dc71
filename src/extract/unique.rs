//! Collision resolution by numeric suffixing.
//!
//! Resolution is based purely on what exists on disk when called. The
//! check-then-write sequence is not atomic, so only one writer may work on
//! a given destination folder at a time.

use std::fs;
use std::path::{Path, PathBuf};

/// `true` if anything occupies `path`, including a dangling symlink.
pub fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Return `path` if it is free, otherwise the first free `stem_N.ext` (N = 1, 2, ...).
pub fn unique_path(path: &Path) -> PathBuf {
    if !is_taken(path) {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let parent = path.parent().unwrap_or(Path::new("."));

    let mut counter: u64 = 1;
    loop {
        let candidate = match &ext {
            Some(ext) => parent.join(format!("{stem}_{counter}.{ext}")),
            None => parent.join(format!("{stem}_{counter}")),
        };
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
