//! Merge bios onto comments and turn HTML fields into CSV-safe plain text

use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Node};
use serde::Serialize;
use threadline_core::SourceError;

use crate::api::CommentRecord;

/// Timestamps are rendered at UTC-05:00 whatever the local zone is
const OUTPUT_UTC_OFFSET_SECS: i32 = -5 * 3600;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Comment with its author's bio attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub comment: CommentRecord,
    /// `created_at_i` rendered with [`format_timestamp`]
    pub created_at: String,
    /// Raw HTML bio, empty when the author has none
    pub bio: String,
}

/// Final CSV row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    pub author: String,
    pub created_at: String,
    pub object_id: String,
    pub comment_text: String,
    pub bio: String,
}

impl OutputRow {
    pub const HEADER: [&'static str; 5] = ["author", "created_at", "object_id", "comment_text", "bio"];
}

/// Render epoch seconds as `YYYY-MM-DD HH:MM:SS` at UTC-05:00.
///
/// Returns `None` when the timestamp is outside chrono's range.
pub fn format_timestamp(epoch_secs: i64) -> Option<String> {
    let offset = FixedOffset::east_opt(OUTPUT_UTC_OFFSET_SECS)?;
    let utc = DateTime::from_timestamp(epoch_secs, 0)?;
    Some(utc.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string())
}

/// Accumulates text the way a browser lays it out: whitespace runs collapse
/// to one space, block boundaries become blank lines.
#[derive(Default)]
struct PlainText {
    out: String,
    pending_space: bool,
    pending_breaks: usize,
}

impl PlainText {
    fn flush_pending(&mut self) {
        if !self.out.is_empty() {
            if self.pending_breaks > 0 {
                for _ in 0..self.pending_breaks {
                    self.out.push('\n');
                }
            } else if self.pending_space {
                self.out.push(' ');
            }
        }
        self.pending_space = false;
        self.pending_breaks = 0;
    }

    fn request_breaks(&mut self, n: usize) {
        self.pending_breaks = self.pending_breaks.max(n);
    }

    fn push_text(&mut self, text: &str) {
        let mut newlines = 0;
        let mut in_space = false;
        for ch in text.chars() {
            if ch.is_whitespace() {
                in_space = true;
                if ch == '\n' {
                    newlines += 1;
                }
                continue;
            }
            if in_space {
                if newlines > 0 {
                    self.request_breaks(newlines.min(2));
                } else {
                    self.pending_space = true;
                }
                in_space = false;
                newlines = 0;
            }
            self.flush_pending();
            self.out.push(ch);
        }
        if in_space {
            if newlines > 0 {
                self.request_breaks(newlines.min(2));
            } else {
                self.pending_space = true;
            }
        }
    }

    fn finish(self) -> String {
        self.out.trim_end().to_string()
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "blockquote"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "table"
            | "tr"
            | "hr"
            | "pre"
    )
}

fn walk(element: ElementRef<'_>, out: &mut PlainText) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_text(&text.text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "script" | "style" => {}
                    "br" => out.request_breaks(1),
                    name if is_block(name) => {
                        out.request_breaks(2);
                        walk(child_el, out);
                        out.request_breaks(2);
                    }
                    _ => walk(child_el, out),
                }
            }
            _ => {}
        }
    }
}

/// Convert an HTML fragment to plain text.
///
/// Tags are dropped, entities decoded and paragraphs separated by a blank
/// line. `<pre>` keeps its line breaks but not its indentation. Malformed
/// markup is handled however the HTML5 parser recovers from it.
pub fn html_to_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let fragment = Html::parse_fragment(html);
    let mut out = PlainText::default();
    walk(fragment.root_element(), &mut out);
    out.finish()
}

/// Upper bound on decode passes; each pass unwraps one level of escaping
const MAX_DECODE_PASSES: usize = 8;

/// Plain text with every comma removed (crude CSV safety, lossy on purpose).
///
/// Escaped markup such as `&lt;b&gt;` decodes to `<b>`, which would parse as
/// a tag if cleaned again, so the text is re-cleaned until it stops changing.
/// Literal tags written in a comment are therefore stripped.
pub fn sanitize_text(html: &str) -> String {
    let mut text = html_to_text(html).replace(',', "");
    for _ in 1..MAX_DECODE_PASSES {
        let again = html_to_text(&text).replace(',', "");
        if again == text {
            break;
        }
        text = again;
    }
    text
}

/// Attach `bios[i]` to `comments[i]` and render the timestamp.
///
/// # Panics
///
/// If `bios` and `comments` differ in length.
pub fn merge(
    comments: Vec<CommentRecord>,
    bios: Vec<String>,
) -> Result<Vec<EnrichedRecord>, SourceError> {
    assert_eq!(
        comments.len(),
        bios.len(),
        "one bio per comment is required for the positional join"
    );
    comments
        .into_iter()
        .zip(bios)
        .map(|(comment, bio)| {
            let created_at = format_timestamp(comment.created_at_i).ok_or_else(|| {
                SourceError::schema(
                    format!("comment {}", comment.object_id),
                    format!("created_at_i {} is out of range", comment.created_at_i),
                )
            })?;
            Ok(EnrichedRecord {
                comment,
                created_at,
                bio,
            })
        })
        .collect()
}

/// Project an enriched record onto the output columns, cleaning HTML fields.
pub fn sanitize(record: EnrichedRecord) -> OutputRow {
    let comment_text = sanitize_text(&record.comment.comment_text);
    let bio = sanitize_text(&record.bio);
    OutputRow {
        author: record.comment.author,
        created_at: record.created_at,
        object_id: record.comment.object_id,
        comment_text,
        bio,
    }
}

/// Merge then sanitize, preserving comment order.
pub fn finalize(
    comments: Vec<CommentRecord>,
    bios: Vec<String>,
) -> Result<Vec<OutputRow>, SourceError> {
    Ok(merge(comments, bios)?.into_iter().map(sanitize).collect())
}
