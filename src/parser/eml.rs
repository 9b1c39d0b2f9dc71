//! Parser for individual `.eml` files (RFC 5322 messages without MBOX framing).
//!
//! Parsing is delegated to `mail-parser`; this module adapts its borrowed part
//! tree into the owned [`Message`] model.

use std::borrow::Cow;
use std::path::Path;

use mail_parser::{MessageParser, MimeHeaders, PartType};
use tracing::{debug, warn};

use crate::error::{ExtractError, Result};
use crate::model::message::{Disposition, Message, MimePart};

/// Maximum depth for recursive multipart descent (bounds recursion on adversarial input).
const MAX_DEPTH: usize = 10;

/// Parse a single `.eml` file into a [`Message`].
pub fn parse_eml(path: impl AsRef<Path>) -> Result<Message> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| ExtractError::io(path, e))?;

    parse_message(&data).ok_or_else(|| ExtractError::MessageParse {
        path: path.to_path_buf(),
        reason: "no parsable message headers".to_string(),
    })
}

/// Parse raw message bytes.
///
/// The source is first decoded as text (honouring a byte-order mark). If it
/// is not valid text, or the text parse yields nothing, parsing is retried on
/// the raw bytes. Returns `None` only if both attempts fail.
pub fn parse_message(raw: &[u8]) -> Option<Message> {
    match decode_source_text(raw) {
        Some(text) => {
            if let Some(msg) = parse_parts(skip_from_line(text.as_bytes())) {
                return Some(msg);
            }
            debug!("Text-mode parse failed, retrying on raw bytes");
        }
        None => debug!("Source is not valid text, parsing raw bytes"),
    }
    parse_parts(skip_from_line(raw))
}

/// Decode the whole source strictly, returning `None` on malformed input.
fn decode_source_text(raw: &[u8]) -> Option<Cow<'_, str>> {
    match encoding_rs::Encoding::for_bom(raw) {
        Some((encoding, bom_len)) => {
            encoding.decode_without_bom_handling_and_without_replacement(&raw[bom_len..])
        }
        None => encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(raw),
    }
}

/// Run `mail-parser` and flatten its part tree.
fn parse_parts(bytes: &[u8]) -> Option<Message> {
    let parsed = MessageParser::default().parse(bytes)?;

    // A "message" without a single header line is just noise.
    let root = parsed.parts.first()?;
    if root.headers.is_empty() {
        return None;
    }

    let mut parts = Vec::new();
    collect_leaves(&parsed, 0, 0, &mut parts);

    Some(Message {
        subject: parsed.subject().map(str::to_string),
        parts,
    })
}

/// Depth-first walk over the multipart tree, pushing leaf parts in document order.
fn collect_leaves(
    msg: &mail_parser::Message<'_>,
    id: usize,
    depth: usize,
    out: &mut Vec<MimePart>,
) {
    let Some(part) = msg.parts.get(id) else {
        return;
    };

    match &part.body {
        PartType::Multipart(children) => {
            if depth >= MAX_DEPTH {
                warn!(depth, "MIME nesting too deep, ignoring deeper parts");
                return;
            }
            for &child in children {
                collect_leaves(msg, child, depth + 1, out);
            }
        }
        _ => out.push(convert_part(part)),
    }
}

/// Build an owned [`MimePart`] from a parsed `mail_parser::MessagePart`.
fn convert_part(part: &mail_parser::MessagePart<'_>) -> MimePart {
    let content_type = part
        .content_type()
        .map(|ct: &mail_parser::ContentType| {
            let main = ct.ctype();
            match ct.subtype() {
                Some(sub) => format!("{main}/{sub}"),
                None => main.to_string(),
            }
        })
        .unwrap_or_else(|| "text/plain".to_string())
        .to_ascii_lowercase();

    let disposition = Disposition::from_value(
        part.content_disposition()
            .map(|d: &mail_parser::ContentType| d.ctype()),
    );

    MimePart {
        content_type,
        disposition,
        filename: part.attachment_name().map(str::to_string),
        content_id: part.content_id().map(str::to_string),
        payload: part.contents().to_vec(),
    }
}

/// Skip a UTF-8 BOM and a leading mbox `From ` separator line, if present.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
