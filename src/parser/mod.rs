//! Message parsing: `.eml` sources into the owned message model.

pub mod eml;
