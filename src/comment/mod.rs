//! Question comment threads.
//!
//! A comment file is either free text or a scraped thread: a metadata
//! block (`Media ID:`, `Source:`, ...) closed by a `====` line, then
//! `#<n> | User: .. | Date: ..` entries. Free text is shown verbatim,
//! threads as cards. Nothing here can fail.

mod parser;
mod render;

pub use parser::{CommentEntry, MetaField, Metadata, StructuredComment, is_structured, parse};
pub use render::{CommentView, EMPTY_PLACEHOLDER, format_comment, render_structured};
