//! Input discovery and validation.
//!
//! Directory scans and explicit file arguments both accept only `.eml` files.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{ExtractError, Result};

/// Extension (without the dot) of accepted message files.
pub const EML_EXTENSION: &str = "eml";

/// `true` if the path has the `.eml` extension (ASCII case-insensitive).
pub fn has_eml_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(EML_EXTENSION))
}

/// Accept an explicit input file only if it is a regular `.eml` file.
pub fn validate_eml_file(path: &Path) -> Result<PathBuf> {
    if path.is_file() && has_eml_extension(path) {
        Ok(path.to_path_buf())
    } else {
        Err(ExtractError::NotAnEmlFile(path.to_path_buf()))
    }
}

/// Accept a path only if it is an existing directory.
pub fn validate_dir(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.to_path_buf())
    } else {
        Err(ExtractError::NotADirectory(path.to_path_buf()))
    }
}

/// List the `.eml` files in `dir`, descending into subdirectories if `recursive`.
///
/// Results are sorted by path so runs are reproducible.
pub fn find_eml_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("cannot read directory"));
                return Err(ExtractError::io(dir, source));
            }
            Err(e) => {
                // Unreadable entries below the root are skipped.
                warn!(path = ?e.path(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && has_eml_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(dir = %dir.display(), recursive, count = files.len(), "Scanned for EML files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"Subject: x\n\n").unwrap();
    }

    #[test]
    fn test_extension_matching() {
        assert!(has_eml_extension(Path::new("a.eml")));
        assert!(has_eml_extension(Path::new("a.EML")));
        assert!(!has_eml_extension(Path::new("a.eml.txt")));
        assert!(!has_eml_extension(Path::new("eml")));
    }

    #[test]
    fn test_non_recursive_scan() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("b.eml"));
        touch(&tmp.path().join("a.eml"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("sub").join("c.eml"));

        let files = find_eml_files(tmp.path(), false).unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("a.eml"), tmp.path().join("b.eml")]
        );
    }

    #[test]
    fn test_recursive_scan() {
        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("a.eml"));
        touch(&tmp.path().join("sub").join("deeper").join("c.eml"));

        let files = find_eml_files(tmp.path(), true).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&tmp.path().join("sub").join("deeper").join("c.eml")));
    }

    #[test]
    fn test_directory_named_like_eml_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("folder.eml")).unwrap();
        assert!(find_eml_files(tmp.path(), false).unwrap().is_empty());
    }

    #[test]
    fn test_missing_root_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_eml_files(&tmp.path().join("gone"), true),
            Err(ExtractError::Io { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        touch(&tmp.path().join("a.eml"));
        touch(&tmp.path().join("locked").join("hidden.eml"));
        touch(&tmp.path().join("open").join("b.eml"));

        let locked = tmp.path().join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can read it anyway; nothing to check then.
        let readable = std::fs::read_dir(&locked).is_ok();

        let files = find_eml_files(tmp.path(), true);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        assert_eq!(
            files.unwrap(),
            vec![tmp.path().join("a.eml"), tmp.path().join("open").join("b.eml")]
        );
    }

    #[test]
    fn test_validate_eml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let good = tmp.path().join("m.eml");
        let bad = tmp.path().join("m.txt");
        touch(&good);
        touch(&bad);

        assert_eq!(validate_eml_file(&good).unwrap(), good);
        assert!(matches!(
            validate_eml_file(&bad),
            Err(ExtractError::NotAnEmlFile(_))
        ));
        assert!(validate_eml_file(&tmp.path().join("missing.eml")).is_err());
    }

    #[test]
    fn test_validate_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(validate_dir(tmp.path()).is_ok());
        let file = tmp.path().join("f.eml");
        touch(&file);
        assert!(matches!(
            validate_dir(&file),
            Err(ExtractError::NotADirectory(_))
        ));
    }
}
