//! Derive a safe on-disk filename for an attachment.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ExtractError, Result};
use crate::model::message::MimePart;

use super::sanitize::sanitize;

/// Leftover RFC 2231 continuation markers (`; filename*1=`) from lenient encoders.
static CONTINUATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*filename\*\d*=").expect("valid regex"));

/// Extensions for types where the lookup table offers several and the usual one isn't first.
const PREFERRED_EXTENSIONS: &[(&str, &str)] = &[
    ("text/plain", "txt"),
    ("text/html", "html"),
    ("text/calendar", "ics"),
    ("image/jpeg", "jpg"),
    ("image/tiff", "tiff"),
    ("audio/mpeg", "mp3"),
    ("video/mpeg", "mpeg"),
    ("application/octet-stream", "bin"),
    ("application/msword", "doc"),
    ("application/vnd.ms-excel", "xls"),
    ("message/rfc822", "eml"),
];

/// Compute the filename an attachment is written under.
///
/// Fails with [`ExtractError::AttachmentName`] when the part declares no
/// filename; such attachments are skipped rather than given an invented name.
pub fn safe_filename(part: &MimePart) -> Result<String> {
    let declared = part
        .filename
        .as_deref()
        .ok_or_else(|| ExtractError::AttachmentName("no filename declared".to_string()))?;

    let cleaned = declared.replace(['"', '\t'], "");
    let cleaned = CONTINUATION_REGEX.replace_all(&cleaned, "");
    let mut filename = sanitize(&cleaned);

    if Path::new(&filename).extension().is_none() {
        if let Some(ext) = extension_for(&part.content_type) {
            filename.push('.');
            filename.push_str(ext);
        }
    }

    Ok(filename)
}

/// Guess a file extension (without the dot) for a `type/subtype` string.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    if let Some((_, ext)) = PREFERRED_EXTENSIONS.iter().find(|(m, _)| *m == mime) {
        return Some(*ext);
    }

    let exts = mime_guess::get_mime_extensions_str(&mime)?;
    let subtype = mime.split('/').nth(1).unwrap_or("");
    exts.iter()
        .find(|e| e.eq_ignore_ascii_case(subtype))
        .or_else(|| exts.first())
        .copied()
}
