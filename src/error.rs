//! Centralized error types for emlextract.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the emlextract library.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// An explicit input file is not a regular `.eml` file.
    #[error("\"{0}\" is not a valid EML file.")]
    NotAnEmlFile(PathBuf),

    /// A path that must be a directory is not one.
    #[error("\"{0}\" is not a valid directory.")]
    NotADirectory(PathBuf),

    /// The message could not be parsed, even after the byte-oriented retry.
    #[error("Failed to parse message '{path}': {reason}")]
    MessageParse { path: PathBuf, reason: String },

    /// No usable filename could be derived for an attachment.
    #[error("Cannot derive attachment filename: {0}")]
    AttachmentName(String),

    /// Creating a folder or writing attachment bytes failed.
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, ExtractError>`.
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a `Write` variant from a path and an `io::Error`.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// `true` for the errors that must stop the program before extraction starts.
    pub fn is_input_validation(&self) -> bool {
        matches!(self, Self::NotAnEmlFile(_) | Self::NotADirectory(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validation_classification() {
        assert!(ExtractError::NotAnEmlFile(PathBuf::from("a.txt")).is_input_validation());
        assert!(ExtractError::NotADirectory(PathBuf::from("x")).is_input_validation());
        assert!(!ExtractError::AttachmentName("none".into()).is_input_validation());
    }

    #[test]
    fn test_display_matches_cli_wording() {
        let err = ExtractError::NotAnEmlFile(PathBuf::from("notes.txt"));
        assert_eq!(err.to_string(), "\"notes.txt\" is not a valid EML file.");
    }
}
