//! Owned message and MIME part types.
//!
//! A [`Message`] is built once per input file by the parser and is read-only
//! afterwards. Parts own their decoded payload, so nothing borrows from the
//! source bytes once parsing is done.

/// Subject used when a message carries no `Subject:` header.
pub const NO_SUBJECT: &str = "No Subject";

/// One parsed email message.
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Decoded subject line (RFC 2047 encoded-words resolved), if present.
    pub subject: Option<String>,

    /// Leaf MIME parts in depth-first document order.
    ///
    /// Multipart containers are flattened away; an embedded `message/rfc822`
    /// is kept as a single leaf whose payload is the raw embedded message.
    pub parts: Vec<MimePart>,
}

impl Message {
    /// The subject to derive the output folder from.
    pub fn subject_or_default(&self) -> &str {
        self.subject.as_deref().unwrap_or(NO_SUBJECT)
    }
}

/// Value of the `Content-Disposition` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// `Content-Disposition: attachment`
    Attachment,
    /// `Content-Disposition: inline`
    Inline,
    /// Header absent or carrying an unrecognized type.
    Unspecified,
}

impl Disposition {
    /// Map a raw disposition type (`"attachment"`, `"INLINE"`, ...) to a [`Disposition`].
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("attachment") => Self::Attachment,
            Some(v) if v.eq_ignore_ascii_case("inline") => Self::Inline,
            _ => Self::Unspecified,
        }
    }
}

/// A leaf node of the message's part tree.
#[derive(Debug, Clone)]
pub struct MimePart {
    /// Lowercased `type/subtype` (e.g. `"image/png"`). Defaults to `text/plain`.
    pub content_type: String,

    /// Disposition from `Content-Disposition`.
    pub disposition: Disposition,

    /// Declared filename (`filename=` on the disposition, or `name=` on the content type).
    pub filename: Option<String>,

    /// `Content-ID`, present on inline parts referenced from an HTML body.
    pub content_id: Option<String>,

    /// Transfer-decoded payload bytes.
    pub payload: Vec<u8>,
}

impl MimePart {
    /// Create a part with the given content type and payload and no other metadata.
    pub fn new(content_type: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into().to_ascii_lowercase(),
            disposition: Disposition::Unspecified,
            filename: None,
            content_id: None,
            payload: payload.into(),
        }
    }

    /// Builder-style setter for the disposition.
    pub fn with_disposition(mut self, disposition: Disposition) -> Self {
        self.disposition = disposition;
        self
    }

    /// Builder-style setter for the declared filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Builder-style setter for the `Content-ID`.
    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// Whether this part is a true attachment rather than inline content.
    pub fn is_attachment(&self) -> bool {
        crate::extract::classify::is_attachment(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_from_value() {
        assert_eq!(
            Disposition::from_value(Some("attachment")),
            Disposition::Attachment
        );
        assert_eq!(Disposition::from_value(Some("INLINE")), Disposition::Inline);
        assert_eq!(
            Disposition::from_value(Some("form-data")),
            Disposition::Unspecified
        );
        assert_eq!(Disposition::from_value(None), Disposition::Unspecified);
    }

    #[test]
    fn test_subject_default() {
        let msg = Message::default();
        assert_eq!(msg.subject_or_default(), "No Subject");

        let msg = Message {
            subject: Some("Invoice".to_string()),
            parts: Vec::new(),
        };
        assert_eq!(msg.subject_or_default(), "Invoice");
    }

    #[test]
    fn test_new_part_lowercases_content_type() {
        let part = MimePart::new("Image/PNG", b"x".to_vec());
        assert_eq!(part.content_type, "image/png");
        assert_eq!(part.disposition, Disposition::Unspecified);
    }
}
