//! Outcome reports produced by the extractor.
//!
//! Every per-message and per-attachment failure ends up here as data instead
//! of propagating out of the batch.

use std::path::PathBuf;

use serde::Serialize;

/// What happened to one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttachmentOutcome {
    /// Written to its primary slot in the message folder.
    Saved {
        filename: String,
        path: PathBuf,
        bytes: u64,
    },

    /// The primary slot was taken; written under the duplicates folder.
    Duplicate {
        filename: String,
        path: PathBuf,
        bytes: u64,
    },

    /// The primary slot holds byte-identical content; nothing written.
    IdenticalSkipped { filename: String, existing: PathBuf },

    /// No filename could be derived; the attachment was dropped.
    Unnamed { reason: String },

    /// Writing failed.
    Failed { filename: String, error: String },
}

impl AttachmentOutcome {
    /// Bytes written to disk for this attachment.
    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Saved { bytes, .. } | Self::Duplicate { bytes, .. } => *bytes,
            _ => 0,
        }
    }
}

/// Terminal state of one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MessageStatus {
    /// The message had no true attachments; no folder was created.
    NoAttachments,

    /// Attachments were processed (individual outcomes may still be failures).
    Extracted,

    /// The source could not be read or parsed.
    ParseFailed { error: String },

    /// The output folder could not be created.
    FolderFailed { error: String },
}

/// Everything the extractor did for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct MessageReport {
    /// The input file.
    pub source: PathBuf,
    /// The subject the folder name was derived from (empty if parsing failed).
    pub subject: String,
    /// `<destination>/<sanitized subject>`; set once the message is parsed.
    pub folder: Option<PathBuf>,
    pub status: MessageStatus,
    /// Per-attachment outcomes, in part order.
    pub attachments: Vec<AttachmentOutcome>,
}

impl MessageReport {
    pub(crate) fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            subject: String::new(),
            folder: None,
            status: MessageStatus::NoAttachments,
            attachments: Vec::new(),
        }
    }

    /// `true` if the message or any of its attachments failed.
    pub fn has_failures(&self) -> bool {
        matches!(
            self.status,
            MessageStatus::ParseFailed { .. } | MessageStatus::FolderFailed { .. }
        ) || self
            .attachments
            .iter()
            .any(|a| matches!(a, AttachmentOutcome::Failed { .. }))
    }
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub messages: usize,
    pub messages_failed: usize,
    pub messages_without_attachments: usize,
    pub attachments_saved: usize,
    pub duplicates: usize,
    pub identical_skipped: usize,
    pub unnamed_skipped: usize,
    pub attachments_failed: usize,
    pub bytes_written: u64,
    pub reports: Vec<MessageReport>,
}

impl BatchSummary {
    /// Fold one message report into the totals.
    pub fn record(&mut self, report: MessageReport) {
        self.messages += 1;
        match report.status {
            MessageStatus::ParseFailed { .. } | MessageStatus::FolderFailed { .. } => {
                self.messages_failed += 1;
            }
            MessageStatus::NoAttachments => self.messages_without_attachments += 1,
            MessageStatus::Extracted => {}
        }
        for outcome in &report.attachments {
            self.bytes_written += outcome.bytes_written();
            match outcome {
                AttachmentOutcome::Saved { .. } => self.attachments_saved += 1,
                AttachmentOutcome::Duplicate { .. } => self.duplicates += 1,
                AttachmentOutcome::IdenticalSkipped { .. } => self.identical_skipped += 1,
                AttachmentOutcome::Unnamed { .. } => self.unnamed_skipped += 1,
                AttachmentOutcome::Failed { .. } => self.attachments_failed += 1,
            }
        }
        self.reports.push(report);
    }

    /// Attachments actually written, primary or duplicate.
    pub fn attachments_written(&self) -> usize {
        self.attachments_saved + self.duplicates
    }

    /// `true` if any message or attachment failed.
    pub fn has_failures(&self) -> bool {
        self.messages_failed > 0 || self.attachments_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut ok = MessageReport::new("a.eml");
        ok.status = MessageStatus::Extracted;
        ok.attachments = vec![
            AttachmentOutcome::Saved {
                filename: "x.pdf".into(),
                path: PathBuf::from("out/A/x.pdf"),
                bytes: 10,
            },
            AttachmentOutcome::Duplicate {
                filename: "x.pdf".into(),
                path: PathBuf::from("out/A/duplicates/x.pdf"),
                bytes: 5,
            },
            AttachmentOutcome::Unnamed {
                reason: "no filename".into(),
            },
        ];

        let mut broken = MessageReport::new("b.eml");
        broken.status = MessageStatus::ParseFailed {
            error: "empty".into(),
        };

        let mut summary = BatchSummary::default();
        summary.record(ok);
        summary.record(broken);

        assert_eq!(summary.messages, 2);
        assert_eq!(summary.messages_failed, 1);
        assert_eq!(summary.attachments_written(), 2);
        assert_eq!(summary.unnamed_skipped, 1);
        assert_eq!(summary.bytes_written, 15);
        assert!(summary.has_failures());
    }

    #[test]
    fn test_attachment_failure_marks_report() {
        let mut report = MessageReport::new("c.eml");
        report.status = MessageStatus::Extracted;
        assert!(!report.has_failures());
        report.attachments.push(AttachmentOutcome::Failed {
            filename: "x.pdf".into(),
            error: "denied".into(),
        });
        assert!(report.has_failures());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = AttachmentOutcome::Saved {
            filename: "x.pdf".into(),
            path: PathBuf::from("x.pdf"),
            bytes: 3,
        };
        let json = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(json["outcome"], "saved");
        assert_eq!(json["bytes"], 3);
    }
}
