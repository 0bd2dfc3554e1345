//! Maps an archive entry path to what it means for the exam tree.

use regex::Regex;
use std::sync::LazyLock;

use super::model::ImageFormat;

/// Question number prefix: a leading digit run followed by `_`.
static QUESTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_").expect("valid question prefix regex"));

/// Marker for re-uploaded originals; never surfaced as images or attachments.
const UPLOAD_MARKER: &str = "_upload";
const COMMENT_SUFFIX: &str = "_comments.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind<'a> {
    Image {
        exam: &'a str,
        number: u32,
        format: ImageFormat,
    },
    Comment {
        exam: &'a str,
        number: u32,
    },
    Attachment {
        exam: &'a str,
        name: &'a str,
    },
    /// Entry does not contribute anything; the reason is for logging only.
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Directory,
    OutsideExamFolder,
    Upload,
    NoQuestionNumber,
}

/// Leading question number of a file name, if it has one.
pub fn question_number(file_name: &str) -> Option<u32> {
    QUESTION_PREFIX
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Classify one entry by its full archive path.
///
/// The first path segment names the exam; the last one is the file name
/// the rules look at. Entries not inside any folder are skipped.
pub fn classify(path: &str, is_directory: bool) -> EntryKind<'_> {
    if is_directory {
        return EntryKind::Skip(SkipReason::Directory);
    }

    let mut segments = path.split('/');
    let exam = segments.next().unwrap_or_default();
    let Some(file_name) = segments.next_back() else {
        return EntryKind::Skip(SkipReason::OutsideExamFolder);
    };

    if let Some(format) = ImageFormat::from_file_name(file_name) {
        if file_name.contains(UPLOAD_MARKER) {
            return EntryKind::Skip(SkipReason::Upload);
        }
        return match question_number(file_name) {
            Some(number) => EntryKind::Image {
                exam,
                number,
                format,
            },
            None => EntryKind::Skip(SkipReason::NoQuestionNumber),
        };
    }

    if file_name.ends_with(COMMENT_SUFFIX) {
        return match question_number(file_name) {
            Some(number) => EntryKind::Comment { exam, number },
            None => EntryKind::Skip(SkipReason::NoQuestionNumber),
        };
    }

    if file_name.contains(UPLOAD_MARKER) {
        return EntryKind::Skip(SkipReason::Upload);
    }

    EntryKind::Attachment {
        exam,
        name: file_name,
    }
}
