//! Exam archives: one top-level folder per exam, holding numbered
//! question images, `<N>_comments.txt` threads and loose attachments.
//!
//! ```text
//! <Exam>/
//!   <N>_<anything>.{webp|png|jpg|jpeg}   question image
//!   <N>_<anything>_upload.*              ignored
//!   <N>_comments.txt                     question comment
//!   <anything else>                      attachment
//! ```

mod classify;
mod decoder;
mod model;

pub use classify::{EntryKind, SkipReason, classify, question_number};
pub use decoder::ExamDecoder;
pub use model::*;
