//! Core data model types: parsed messages, MIME parts, and extraction reports.

pub mod message;
pub mod report;
