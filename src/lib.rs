//! # quizview
//!
//! Reads archived exam question sets distributed as ZIP files and turns
//! them into structured exams a viewer can display.
//!
//! Each top-level folder of the archive is one exam. Inside it,
//! `<N>_*.png|webp|jpg|jpeg` files are question images,
//! `<N>_comments.txt` files carry the question's comment thread and
//! everything else is an attachment.
//!
//! ## Features
//!
//! - Archives from memory, the local filesystem or HTTP(S) (Range requests)
//! - ZIP64, STORED and DEFLATE
//! - Structured comment threads rendered as escaped HTML fragments
//!
//! ## Example
//!
//! ```no_run
//! use quizview::{format_comment, load_exams};
//!
//! #[tokio::main]
//! async fn main() {
//!     let response = load_exams("exams.zip").await;
//!     let Some(exams) = response.exams else {
//!         eprintln!("{}", response.error.unwrap_or_default());
//!         return;
//!     };
//!
//!     for exam in &exams {
//!         for question in &exam.questions {
//!             let html = format_comment(question.comment.as_deref());
//!             println!("{} #{}: {}", exam.name, question.number, html);
//!         }
//!     }
//! }
//! ```

pub mod cli;
pub mod comment;
pub mod exam;
pub mod io;
pub mod loader;
pub mod logger;
pub mod zip;

pub use cli::Cli;
pub use comment::{CommentView, StructuredComment, format_comment};
pub use exam::{Attachment, DecodeResponse, Exam, ExamDecoder, Question, QuestionImage};
pub use io::{HttpRangeReader, LocalFileReader, MemoryReader, ReadAt};
pub use loader::{decode_bytes, load_exams, read_attachment};
pub use zip::{ZipEntry, ZipExtractor};
