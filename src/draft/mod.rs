//! The draft document: rendering, parsing, and the temporary file that
//! carries it through the editor.
//!
//! ```text
//! <description>
//! # First line of this file is used for the ImageDescription
//! # An empty line aborts the change.
//! #
//! # Files to be modified, and their current value
//! # (remove to exclude from editing):
//! #
//! # file: beach1.jpg
//! old
//! # file: beach2.jpg
//!
//! ```
//!
//! [`render`] and [`parse`] take the marker from the same [`Config`](crate::Config)
//! value, so the two sides of the grammar cannot drift apart. Marker text
//! inside a stored value is broken up when rendered, so only file lines yield
//! paths.

mod document;
mod parse;
mod render;

pub use document::DraftDocument;
pub use parse::parse;
pub use render::{can_render, header, render};

/// Prefix of a file line. Any marker that is a suffix of this one (such as
/// `"file: "`) still recovers the paths from a draft rendered with it.
pub const DEFAULT_MARKER: &str = "# file: ";
