//! Separate true attachments from inline content.

use crate::model::message::{Disposition, Message, MimePart};

/// Whether a part is a true attachment.
///
/// Only `Content-Disposition: attachment` qualifies, with or without a
/// filename. Inline parts and parts with no (or an unknown) disposition are
/// body content, even when they declare a `name=`.
pub fn is_attachment(part: &MimePart) -> bool {
    part.disposition == Disposition::Attachment
}

/// The true attachments of a message, in depth-first document order.
pub fn attachments(message: &Message) -> Vec<&MimePart> {
    message.parts.iter().filter(|p| p.is_attachment()).collect()
}
