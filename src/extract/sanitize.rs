//! Turn arbitrary text (subjects, attachment names) into a safe path component.

/// Returned for input that is empty, or empty once cleaned.
pub const PLACEHOLDER: &str = "unnamed";

/// Maximum length of a sanitized name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Characters replaced with `_`.
const RESERVED: &[char] = &[
    '/', '\\', '|', '[', ']', '{', '}', ':', '<', '>', '+', '=', ';', ',', '?', '!', '*', '"',
    '~', '#', '$', '%', '&', '@', '\'',
];

/// Sanitize a string for use as a file or folder name.
///
/// - Reserved characters and control characters become `_`.
/// - Any run of whitespace becomes a single space.
/// - The result is cut to [`MAX_NAME_LEN`] characters.
/// - Leading and trailing spaces and periods are stripped (Windows rejects
///   names ending in either).
/// - Empty results become [`PLACEHOLDER`].
///
/// The function is total and idempotent.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
            continue;
        }
        in_space = false;
        if RESERVED.contains(&c) || c.is_control() {
            out.push('_');
        } else {
            out.push(c);
        }
    }

    // Truncate before trimming so the cut can never leave a trailing space or dot.
    let truncated: String = out.chars().take(MAX_NAME_LEN).collect();
    let trimmed = truncated.trim_matches(|c| c == ' ' || c == '.');

    if trimmed.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        trimmed.to_string()
    }
}
