//! Widgets drawn around the editor.

pub mod header;
pub mod status;
