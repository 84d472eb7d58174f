/*!
 * HTML rendering of translated chapters.
 *
 * Known translated names are wrapped in colored spans carrying the
 * original name, longest translation first. Text is kept as a list of
 * plain and tagged segments while names are applied, so a shorter name is
 * never matched inside a span produced for a longer one.
 */

use std::fmt;

use crate::glossary::{Glossary, NameEntry};
use crate::translation::text::escape_html;

/// Span color of a rendered name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameColor {
    /// Unverified local name
    Default,
    /// Contained in a verified name
    Child,
    /// Contains a verified name
    Parent,
    /// Shared by every novel
    Global,
    /// Verified by the operator
    Checked,
}

impl NameColor {
    /// Color for `entry`: checked, then global, then parent, then child
    pub fn for_entry(glossary: &Glossary, entry: &NameEntry) -> Self {
        if entry.checked {
            Self::Checked
        } else if glossary.is_global(&entry.original) {
            Self::Global
        } else if glossary.is_parent(entry) {
            Self::Parent
        } else if glossary.is_child(entry) {
            Self::Child
        } else {
            Self::Default
        }
    }

    /// CSS hex value
    pub fn hex(self) -> &'static str {
        match self {
            Self::Default => "#a35c5c",
            Self::Child => "#a3754c",
            Self::Parent => "#7a5c9e",
            Self::Global => "#5c9c7c",
            Self::Checked => "#5c7c9c",
        }
    }
}

impl fmt::Display for NameColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

enum Segment<'a> {
    Plain(String),
    Name(&'a NameEntry, NameColor),
}

/// Split plain segments around every occurrence of `entry.translated`
fn apply_name<'a>(segments: Vec<Segment<'a>>, entry: &'a NameEntry, color: NameColor) -> Vec<Segment<'a>> {
    let mut output = Vec::with_capacity(segments.len());

    for segment in segments {
        let Segment::Plain(text) = segment else {
            output.push(segment);
            continue;
        };

        if !text.contains(entry.translated.as_str()) {
            output.push(Segment::Plain(text));
            continue;
        }

        let mut pieces = text.split(entry.translated.as_str()).peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                output.push(Segment::Plain(piece.to_string()));
            }
            if pieces.peek().is_some() {
                output.push(Segment::Name(entry, color));
            }
        }
    }

    output
}

/// Render the tagged span for one name occurrence
pub fn name_span(entry: &NameEntry, color: NameColor) -> String {
    format!(
        r#"<span style="color: {}; user-select: all;" data-original="{}">{}</span>"#,
        color,
        escape_html(&entry.original),
        escape_html(&entry.translated)
    )
}

fn plain_html(text: &str) -> String {
    escape_html(text).replace('\n', "<br>")
}

/// Render translated text as HTML with every known name colored
pub fn render_chapter(translated: &str, glossary: &Glossary) -> String {
    let mut names: Vec<&NameEntry> = glossary
        .names()
        .into_iter()
        .filter(|n| !n.translated.is_empty())
        .collect();
    names.sort_by(|a, b| b.translated_len().cmp(&a.translated_len()));

    let mut segments = vec![Segment::Plain(translated.to_string())];
    for entry in names {
        let color = NameColor::for_entry(glossary, entry);
        segments = apply_name(segments, entry, color);
    }

    segments
        .iter()
        .map(|segment| match segment {
            Segment::Plain(text) => plain_html(text),
            Segment::Name(entry, color) => name_span(entry, *color),
        })
        .collect()
}

/// Standalone error block shown instead of a chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    /// What was being done
    pub reason: String,
    /// Underlying error message
    pub details: String,
}

impl ErrorPanel {
    /// Create a new error panel
    pub fn new(reason: impl Into<String>, details: impl fmt::Display) -> Self {
        Self {
            reason: reason.into(),
            details: details.to_string(),
        }
    }

    /// Render the panel as an HTML block
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div style="font-family: system-ui, sans-serif; padding: 1.5rem; margin: 3rem auto; "#,
                r#"max-width: 600px; border-left: 5px solid #d00; background-color: rgba(255, 0, 0, 0.05); "#,
                r#"color: inherit; border-radius: 6px;">"#,
                r#"<h2 style="margin-top: 0;">An error occurred</h2>"#,
                "<p><strong>Reason:</strong> {}</p>",
                "<p><strong>Details:</strong> {}</p>",
                "<p>Try refreshing the page.</p>",
                "</div>"
            ),
            escape_html(&self.reason),
            escape_html(&self.details)
        )
    }
}

impl fmt::Display for ErrorPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.details)
    }
}
