//! Per-message extraction: folder layout, primary vs. duplicate placement, writing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::ExtractConfig;
use crate::error::{ExtractError, Result};
use crate::model::message::{Message, MimePart};
use crate::model::report::{AttachmentOutcome, BatchSummary, MessageReport, MessageStatus};
use crate::parser::eml::parse_eml;

use super::classify;
use super::filename::safe_filename;
use super::sanitize::sanitize;
use super::unique::{is_taken, unique_path};

/// Writes the attachments of `.eml` messages under `<destination>/<subject>/`.
///
/// Messages are handled strictly one at a time. Collision handling relies on
/// filesystem existence checks, so two extractors must never share a
/// destination concurrently.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Process every file in order, calling `progress(index, total, report)` after each.
    ///
    /// Never fails: each file's problems are recorded in its report.
    pub fn run_batch(
        &self,
        files: &[PathBuf],
        progress: &dyn Fn(usize, usize, &MessageReport),
    ) -> BatchSummary {
        let total = files.len();
        let mut summary = BatchSummary::default();

        for (i, file) in files.iter().enumerate() {
            let report = self.extract_file(file);
            progress(i, total, &report);
            summary.record(report);
        }

        info!(
            messages = summary.messages,
            failed = summary.messages_failed,
            written = summary.attachments_written(),
            "Batch finished"
        );
        summary
    }

    /// Parse one `.eml` file and extract its attachments.
    pub fn extract_file(&self, path: &Path) -> MessageReport {
        debug!(path = %path.display(), "Processing file");
        match parse_eml(path) {
            Ok(message) => self.extract_message(&message, path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unparsable message");
                let mut report = MessageReport::new(path);
                report.status = MessageStatus::ParseFailed {
                    error: e.to_string(),
                };
                report
            }
        }
    }

    /// Extract the attachments of an already parsed message.
    ///
    /// The message folder is only created once at least one attachment exists;
    /// the duplicates folder only on the first collision.
    pub fn extract_message(&self, message: &Message, source: impl Into<PathBuf>) -> MessageReport {
        let mut report = MessageReport::new(source);
        let subject = message.subject_or_default();
        let basepath = self.config.destination.join(sanitize(subject));
        let duplicates_path = basepath.join(&self.config.duplicates_dir);

        report.subject = subject.to_string();
        report.folder = Some(basepath.clone());

        let attachments = classify::attachments(message);
        if attachments.is_empty() {
            debug!(subject, "No attachments found");
            report.status = MessageStatus::NoAttachments;
            return report;
        }

        if let Err(e) = fs::create_dir_all(&basepath) {
            let err = ExtractError::write(&basepath, e);
            warn!(error = %err, "Cannot create message folder");
            report.status = MessageStatus::FolderFailed {
                error: err.to_string(),
            };
            return report;
        }

        report.status = MessageStatus::Extracted;
        for part in attachments {
            let outcome = self.extract_attachment(part, &basepath, &duplicates_path);
            report.attachments.push(outcome);
        }
        report
    }

    fn extract_attachment(
        &self,
        part: &MimePart,
        basepath: &Path,
        duplicates_path: &Path,
    ) -> AttachmentOutcome {
        let filename = match safe_filename(part) {
            Ok(name) => name,
            Err(e) => {
                info!(content_type = %part.content_type, error = %e, "Skipping attachment");
                return AttachmentOutcome::Unnamed {
                    reason: e.to_string(),
                };
            }
        };

        let filepath = basepath.join(&filename);
        if !is_taken(&filepath) {
            return match write_payload(&filepath, &part.payload) {
                Ok(bytes) => AttachmentOutcome::Saved {
                    filename,
                    path: filepath,
                    bytes,
                },
                Err(e) => failed(filename, &e),
            };
        }

        if self.config.skip_identical && same_content(&filepath, &part.payload) {
            debug!(path = %filepath.display(), "Identical attachment already present");
            return AttachmentOutcome::IdenticalSkipped {
                filename,
                existing: filepath,
            };
        }

        if let Err(e) = fs::create_dir_all(duplicates_path) {
            return failed(filename, &ExtractError::write(duplicates_path, e));
        }
        let target = unique_path(&duplicates_path.join(&filename));
        debug!(from = %filepath.display(), to = %target.display(), "Name collision");

        match write_payload(&target, &part.payload) {
            Ok(bytes) => AttachmentOutcome::Duplicate {
                filename,
                path: target,
                bytes,
            },
            Err(e) => failed(filename, &e),
        }
    }
}

fn failed(filename: String, error: &ExtractError) -> AttachmentOutcome {
    warn!(filename = %filename, error = %error, "Failed to save attachment");
    AttachmentOutcome::Failed {
        filename,
        error: error.to_string(),
    }
}

fn write_payload(path: &Path, payload: &[u8]) -> Result<u64> {
    fs::write(path, payload).map_err(|e| ExtractError::write(path, e))?;
    Ok(payload.len() as u64)
}

/// Compare an existing file with a payload by length, then SHA-256.
fn same_content(existing: &Path, payload: &[u8]) -> bool {
    let Ok(meta) = fs::symlink_metadata(existing) else {
        return false;
    };
    if !meta.is_file() || meta.len() != payload.len() as u64 {
        return false;
    }

    let mut hasher = Sha256::new();
    let hashed = fs::File::open(existing).and_then(|mut f| io::copy(&mut f, &mut hasher));
    match hashed {
        Ok(_) => hasher.finalize() == Sha256::digest(payload),
        Err(e) => {
            debug!(path = %existing.display(), error = %e, "Cannot hash existing file");
            false
        }
    }
}
