use maud::{Markup, html};

use super::parser::{CommentEntry, MetaField, StructuredComment, is_structured, parse};

pub const EMPTY_PLACEHOLDER: &str = "No comment available for this question";

/// What a question's comment looks like once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentView<'a> {
    Empty,
    Plain(&'a str),
    Structured(StructuredComment),
}

impl<'a> CommentView<'a> {
    /// Absent and whitespace-only comments are both `Empty`.
    pub fn from_text(comment: Option<&'a str>) -> Self {
        match comment {
            Some(text) if !text.trim().is_empty() => {
                if is_structured(text) {
                    CommentView::Structured(parse(text))
                } else {
                    CommentView::Plain(text)
                }
            }
            _ => CommentView::Empty,
        }
    }

    pub fn render(&self) -> Markup {
        match self {
            CommentView::Empty => html! {
                p.no-comment { (EMPTY_PLACEHOLDER) }
            },
            CommentView::Plain(text) => html! {
                pre.comment-plain style="white-space: pre-wrap; font-family: inherit;" { (text) }
            },
            CommentView::Structured(comment) => render_structured(comment),
        }
    }
}

/// Render a comment (or its absence) as an HTML fragment.
///
/// Every piece of comment text is escaped; the result can be inserted
/// into the page as-is.
pub fn format_comment(comment: Option<&str>) -> String {
    CommentView::from_text(comment).render().into_string()
}

fn is_web_link(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

pub fn render_structured(comment: &StructuredComment) -> Markup {
    html! {
        div.comment-structured {
            @if !comment.metadata.is_empty() {
                div.comment-meta {
                    @for (field, value) in comment.metadata.fields() {
                        div.meta-row {
                            span.meta-label { (field.label()) ":" }
                            @if field == MetaField::Source && is_web_link(value) {
                                a.meta-value href=(value) target="_blank" rel="noopener noreferrer" { (value) }
                            } @else {
                                span.meta-value { (value) }
                            }
                        }
                    }
                }
            }
            div.comment-list {
                @for entry in &comment.entries {
                    (render_entry(entry))
                }
            }
        }
    }
}

fn render_entry(entry: &CommentEntry) -> Markup {
    html! {
        div.comment-card {
            div.comment-header {
                span.comment-number { "#" (entry.number) }
                span.comment-user { (entry.user) }
                span.comment-date { (entry.date) }
            }
            div.comment-content { (entry.content) }
            @if let Some(id) = &entry.id {
                div.comment-id { "ID: " (id) }
            }
        }
    }
}
