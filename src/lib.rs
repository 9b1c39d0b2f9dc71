//! `emlextract`: pull file attachments out of `.eml` messages.
//!
//! Each message's attachments land in `<destination>/<sanitized subject>/`.
//! When a filename is already taken, the attachment goes to a `duplicates`
//! subfolder under a `_N`-suffixed name instead of overwriting anything.

pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
