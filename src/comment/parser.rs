//! Line grammar of structured comment files.
//!
//! ```text
//! Media ID: 1234
//! Source: https://example.com/post/1234
//! Extracted At: 2024-05-01 10:00
//! Total Comments: 2
//! ==========
//! #1 | User: Alice | Date: 2024-01-01
//! ID: abc123
//! Content:
//! first line
//! second line
//! ---
//! ```

use std::iter::Peekable;

const SEPARATOR: &str = "====";
const CONTENT_END: &str = "---";

/// Metadata fields of the header block, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    MediaId,
    Source,
    ExtractedAt,
    TotalComments,
}

impl MetaField {
    pub const ALL: [MetaField; 4] = [
        MetaField::MediaId,
        MetaField::Source,
        MetaField::ExtractedAt,
        MetaField::TotalComments,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetaField::MediaId => "Media ID",
            MetaField::Source => "Source",
            MetaField::ExtractedAt => "Extracted At",
            MetaField::TotalComments => "Total Comments",
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            MetaField::MediaId => "Media ID:",
            MetaField::Source => "Source:",
            MetaField::ExtractedAt => "Extracted At:",
            MetaField::TotalComments => "Total Comments:",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub media_id: Option<String>,
    pub source: Option<String>,
    pub extracted_at: Option<String>,
    pub total_comments: Option<String>,
}

impl Metadata {
    pub fn get(&self, field: MetaField) -> Option<&str> {
        match field {
            MetaField::MediaId => self.media_id.as_deref(),
            MetaField::Source => self.source.as_deref(),
            MetaField::ExtractedAt => self.extracted_at.as_deref(),
            MetaField::TotalComments => self.total_comments.as_deref(),
        }
    }

    fn slot(&mut self, field: MetaField) -> &mut Option<String> {
        match field {
            MetaField::MediaId => &mut self.media_id,
            MetaField::Source => &mut self.source,
            MetaField::ExtractedAt => &mut self.extracted_at,
            MetaField::TotalComments => &mut self.total_comments,
        }
    }

    /// Present fields in display order.
    pub fn fields(&self) -> impl Iterator<Item = (MetaField, &str)> {
        MetaField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEntry {
    /// Label after `#`, kept verbatim (`1`, `1a`, ...)
    pub number: String,
    pub user: String,
    pub date: String,
    pub id: Option<String>,
    /// Content lines joined by single spaces
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredComment {
    pub metadata: Metadata,
    pub entries: Vec<CommentEntry>,
}

/// Whether `text` follows the metadata + entries grammar.
pub fn is_structured(text: &str) -> bool {
    text.contains("Media ID:") && text.contains("Source:")
}

/// Parse a structured comment. Never fails; unknown lines are ignored.
pub fn parse(text: &str) -> StructuredComment {
    let mut lines = text.lines().peekable();
    let metadata = parse_metadata(&mut lines);
    let entries = parse_entries(&mut lines);
    StructuredComment { metadata, entries }
}

/// Consume lines up to and including the `====` separator.
fn parse_metadata<'a>(lines: &mut impl Iterator<Item = &'a str>) -> Metadata {
    let mut metadata = Metadata::default();

    for line in lines {
        if line.contains(SEPARATOR) {
            break;
        }
        let line = line.trim();
        for field in MetaField::ALL {
            if let Some(value) = line.strip_prefix(field.prefix()) {
                *metadata.slot(field) = Some(value.trim().to_string());
                break;
            }
        }
    }

    metadata
}

fn parse_entries<'a, I>(lines: &mut Peekable<I>) -> Vec<CommentEntry>
where
    I: Iterator<Item = &'a str>,
{
    let mut entries = Vec::new();
    let mut current: Option<CommentEntry> = None;

    while let Some(line) = lines.next() {
        let line = line.trim();

        if is_header(line) {
            entries.extend(current.take());
            current = Some(parse_header(line));
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        if let Some(id) = line.strip_prefix("ID:") {
            entry.id = Some(id.trim().to_string());
        } else if line.starts_with("Content:") {
            entry.content = collect_content(lines);
        }
    }

    entries.extend(current);
    entries
}

fn is_header(line: &str) -> bool {
    line.starts_with('#') && line.contains('|')
}

/// `#<label> | User: <name> | Date: <date>`; missing fields fall back
/// to `Unknown` and the empty string.
fn parse_header(line: &str) -> CommentEntry {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();

    let number = fields[0]
        .strip_prefix('#')
        .unwrap_or(fields[0])
        .trim()
        .to_string();
    let field_value = |prefix: &str| {
        fields[1..]
            .iter()
            .find_map(|f| f.strip_prefix(prefix))
            .map(|v| v.trim().to_string())
    };

    CommentEntry {
        number,
        user: field_value("User:").unwrap_or_else(|| "Unknown".to_string()),
        date: field_value("Date:").unwrap_or_default(),
        id: None,
        content: String::new(),
    }
}

/// Gather the lines after `Content:` until one containing `---`.
///
/// Text on the `Content:` line itself is not content. The terminating
/// line is consumed and discarded, so it can never be mistaken for the
/// next header. A `---` inside legitimate text ends the block too.
fn collect_content<'a, I>(lines: &mut Peekable<I>) -> String
where
    I: Iterator<Item = &'a str>,
{
    let mut parts = Vec::new();

    while let Some(line) = lines.next_if(|line| !line.contains(CONTENT_END)) {
        let line = line.trim();
        if !line.is_empty() {
            parts.push(line);
        }
    }
    lines.next();

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Media ID: 98765
Source: https://example.com/p/98765
Extracted At: 2024-05-01 10:00:00
Total Comments: 2
==================================================
#1 | User: Alice | Date: 2024-01-01
ID: abc123
Content:
The answer is B
because of the second clause.
--------------------------------------------------
#1a | User: Bob | Date: 2024-01-02
Content:
Agreed.
---
";

    #[test]
    fn detection_needs_both_markers() {
        assert!(is_structured(SAMPLE));
        assert!(!is_structured("Media ID: 1\nno source here"));
        assert!(!is_structured("Source: somewhere"));
        assert!(is_structured("text Source: x and Media ID: y inline"));
    }

    #[test]
    fn metadata_block() {
        let parsed = parse(SAMPLE);
        assert_eq!(parsed.metadata.media_id.as_deref(), Some("98765"));
        assert_eq!(
            parsed.metadata.source.as_deref(),
            Some("https://example.com/p/98765")
        );
        assert_eq!(
            parsed.metadata.extracted_at.as_deref(),
            Some("2024-05-01 10:00:00")
        );
        assert_eq!(parsed.metadata.total_comments.as_deref(), Some("2"));

        let labels: Vec<_> = parsed.metadata.fields().map(|(f, _)| f.label()).collect();
        assert_eq!(
            labels,
            ["Media ID", "Source", "Extracted At", "Total Comments"]
        );
    }

    #[test]
    fn entries_with_content() {
        let parsed = parse(SAMPLE);
        assert_eq!(parsed.entries.len(), 2);

        let first = &parsed.entries[0];
        assert_eq!(first.number, "1");
        assert_eq!(first.user, "Alice");
        assert_eq!(first.date, "2024-01-01");
        assert_eq!(first.id.as_deref(), Some("abc123"));
        assert_eq!(first.content, "The answer is B because of the second clause.");

        let second = &parsed.entries[1];
        assert_eq!(second.number, "1a");
        assert_eq!(second.user, "Bob");
        assert_eq!(second.id, None);
        assert_eq!(second.content, "Agreed.");
    }

    #[test]
    fn header_defaults() {
        let parsed = parse("Media ID: 1\nSource: x\n====\n#7 | Date: 2024-03-03\n#8 | note\n");
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].user, "Unknown");
        assert_eq!(parsed.entries[0].date, "2024-03-03");
        assert_eq!(parsed.entries[1].user, "Unknown");
        assert_eq!(parsed.entries[1].date, "");
    }

    #[test]
    fn unknown_metadata_lines_are_ignored() {
        let parsed = parse("Media ID: 5\nFoo: bar\n   Source:   s  \n====\n");
        assert_eq!(parsed.metadata.media_id.as_deref(), Some("5"));
        assert_eq!(parsed.metadata.source.as_deref(), Some("s"));
        assert_eq!(parsed.metadata.extracted_at, None);
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn no_separator_means_no_entries() {
        let parsed = parse("Media ID: 5\nSource: s\n#1 | User: A\nContent:\nhi\n");
        assert_eq!(parsed.metadata.media_id.as_deref(), Some("5"));
        assert!(parsed.entries.is_empty());
    }

    #[test]
    fn id_and_content_before_any_header_are_ignored() {
        let parsed = parse("Media ID: 5\nSource: s\n====\nID: stray\nContent:\nloose\n#1 | User: A\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].id, None);
        assert_eq!(parsed.entries[0].content, "");
    }

    #[test]
    fn content_runs_to_end_of_input() {
        let parsed = parse("Media ID: 5\nSource: s\n====\n#1 | User: A\nContent:\none\n\n  two  \n");
        assert_eq!(parsed.entries[0].content, "one two");
    }

    #[test]
    fn content_block_swallows_following_headers() {
        let parsed = parse(
            "Media ID: 5\nSource: s\n====\n#1 | User: A\nContent:\none\n#2 | User: B\n---\n#3 | User: C\n",
        );
        let numbers: Vec<_> = parsed.entries.iter().map(|e| e.number.as_str()).collect();
        assert_eq!(numbers, ["1", "3"]);
        assert_eq!(parsed.entries[0].content, "one #2 | User: B");
    }

    #[test]
    fn triple_hyphen_inside_text_ends_content() {
        let parsed = parse(
            "Media ID: 5\nSource: s\n====\n#1 | User: A\nContent:\nrange 1---5 applies\nmore\n",
        );
        assert_eq!(parsed.entries[0].content, "");
    }

    #[test]
    fn terminator_line_is_never_a_header() {
        let parsed = parse(
            "Media ID: 5\nSource: s\n====\n#1 | User: A\nContent:\nx\n#--- | User: Ghost\n",
        );
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].content, "x");
    }

    #[test]
    fn text_on_content_line_is_not_content() {
        let parsed = parse("Media ID: 5\nSource: s\n====\n#1 | User: A\nContent: inline\nnext\n---\n");
        assert_eq!(parsed.entries[0].content, "next");
    }

    #[test]
    fn crlf_input() {
        let parsed = parse("Media ID: 5\r\nSource: s\r\n====\r\n#2 | User: Z | Date: d\r\nID: q\r\n");
        assert_eq!(parsed.metadata.source.as_deref(), Some("s"));
        assert_eq!(parsed.entries[0].user, "Z");
        assert_eq!(parsed.entries[0].id.as_deref(), Some("q"));
    }
}
