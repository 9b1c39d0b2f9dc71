//! The extraction pipeline: sanitizing names, classifying parts, resolving
//! collisions, and writing attachments to disk.

pub mod classify;
pub mod filename;
pub mod orchestrator;
pub mod sanitize;
pub mod unique;

pub use orchestrator::Extractor;
