// Markdown heading outline with byte offsets.
//
// Only ATX headings count. `#` lines inside fenced code or HTML blocks and
// setext underlines are ignored, so the anchor resolver never treats them
// as section boundaries.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::document::Document;

/// One ATX heading, located by the line it occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Offset of the first byte of the heading line.
    pub start: usize,
    /// Offset of the heading line's terminator (or end of text).
    pub line_end: usize,
    /// Inline text of the heading, trimmed.
    pub text: String,
}

impl Heading {
    /// Whether `offset` falls on this heading's line, terminator excluded.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.line_end
    }

    /// Offset after the last non-whitespace byte of the heading line.
    pub fn content_end(&self, text: &str) -> usize {
        self.start + text[self.start..self.line_end].trim_end().len()
    }
}

/// Headings of the document body, with offsets into the full text.
pub fn outline(doc: &Document<'_>) -> Vec<Heading> {
    let base = doc.frontmatter_end();
    parse_headings(doc.body())
        .into_iter()
        .map(|heading| Heading {
            start: heading.start + base,
            line_end: heading.line_end + base,
            ..heading
        })
        .collect()
}

/// Headings of `markdown` in document order.
pub fn parse_headings(markdown: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut current: Option<Heading> = None;

    for (event, range) in Parser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                if !is_atx_heading(markdown, range.start) {
                    current = None;
                    continue;
                }

                let start = line_start(markdown, range.start);
                current = Some(Heading {
                    level: level_to_u8(level),
                    start,
                    line_end: line_end(markdown, start),
                    text: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(heading) = current.as_mut() {
                    heading.text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(mut heading) = current.take() {
                    heading.text = heading.text.trim().to_string();
                    headings.push(heading);
                }
            }
            _ => {}
        }
    }

    headings
}

fn is_atx_heading(markdown: &str, offset: usize) -> bool {
    markdown[line_start(markdown, offset)..]
        .chars()
        .find(|ch| !ch.is_whitespace())
        .map(|ch| ch == '#')
        .unwrap_or(false)
}

fn line_start(markdown: &str, offset: usize) -> usize {
    markdown[..offset].rfind('\n').map(|index| index + 1).unwrap_or(0)
}

fn line_end(markdown: &str, offset: usize) -> usize {
    markdown[offset..].find('\n').map(|index| offset + index).unwrap_or(markdown.len())
}

fn level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
