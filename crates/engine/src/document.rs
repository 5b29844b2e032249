// Immutable document snapshot with its protected frontmatter boundary.
//
// Frontmatter is a leading `---` (YAML) or `+++` (TOML) block closed by the
// same delimiter on its own line. Nothing before `frontmatter_end` may ever
// be the target of an edit; `guard` enforces that on every candidate.

const UTF8_BOM: char = '\u{feff}';

/// A text snapshot for the duration of one resolution call.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    text: &'a str,
    frontmatter_end: usize,
}

impl<'a> Document<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, frontmatter_end: frontmatter_end(text) }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Offset immediately after the metadata header, or 0 without one.
    pub fn frontmatter_end(&self) -> usize {
        self.frontmatter_end
    }

    /// Everything after the frontmatter.
    pub fn body(&self) -> &'a str {
        &self.text[self.frontmatter_end..]
    }

    /// A body holding only whitespace counts as empty.
    pub fn body_is_empty(&self) -> bool {
        self.body().trim().is_empty()
    }

    /// Clamp a candidate so it never starts inside the frontmatter.
    pub fn guard(&self, start: usize, end: usize) -> (usize, usize) {
        let start = start.max(self.frontmatter_end);
        (start, end.max(start))
    }
}

/// Offset after the closing frontmatter delimiter line, or 0.
pub fn frontmatter_end(text: &str) -> usize {
    let bom = if text.starts_with(UTF8_BOM) { UTF8_BOM.len_utf8() } else { 0 };
    let mut lines = LineSpans::new(text, bom);

    let Some((_, first_end, first)) = lines.next() else {
        return 0;
    };
    let closers: &[&str] = match first {
        "---" => &["---", "..."],
        "+++" => &["+++"],
        _ => return 0,
    };
    // A lone opening delimiter with nothing after it is not a block.
    if first_end == text.len() {
        return 0;
    }

    lines.find(|(_, _, line)| closers.contains(line)).map(|(_, end, _)| end).unwrap_or(0)
}

/// Iterates `(start, end_including_terminator, content_without_terminator)`.
struct LineSpans<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> LineSpans<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self { text, pos }
    }
}

impl<'a> Iterator for LineSpans<'a> {
    type Item = (usize, usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let end = rest.find('\n').map(|index| start + index + 1).unwrap_or(self.text.len());
        self.pos = end;
        let content = self.text[start..end].trim_end_matches('\n').trim_end_matches('\r');
        Some((start, end, content.trim_end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_frontmatter_ends_after_closing_line() {
        let text = "---\ntitle: Draft\n---\n# Body\n";
        let doc = Document::new(text);
        assert_eq!(doc.frontmatter_end(), "---\ntitle: Draft\n---\n".len());
        assert_eq!(doc.body(), "# Body\n");
    }

    #[test]
    fn yaml_frontmatter_accepts_dot_terminator() {
        let text = "---\na: 1\n...\nbody";
        assert_eq!(frontmatter_end(text), "---\na: 1\n...\n".len());
    }

    #[test]
    fn toml_frontmatter_is_detected() {
        let text = "+++\ntitle = \"x\"\n+++\nbody";
        assert_eq!(frontmatter_end(text), "+++\ntitle = \"x\"\n+++\n".len());
    }

    #[test]
    fn closing_line_without_newline_ends_at_text_end() {
        let text = "---\na: 1\n---";
        assert_eq!(frontmatter_end(text), text.len());
    }

    #[test]
    fn crlf_frontmatter_is_detected() {
        let text = "---\r\na: 1\r\n---\r\nbody";
        assert_eq!(frontmatter_end(text), "---\r\na: 1\r\n---\r\n".len());
    }

    #[test]
    fn unclosed_block_is_not_frontmatter() {
        assert_eq!(frontmatter_end("---\ntitle: x\nno end"), 0);
        assert_eq!(frontmatter_end("---"), 0);
    }

    #[test]
    fn delimiter_must_open_the_document() {
        assert_eq!(frontmatter_end("intro\n---\na\n---\n"), 0);
        assert_eq!(frontmatter_end(""), 0);
    }

    #[test]
    fn bom_before_frontmatter_is_tolerated() {
        let text = "\u{feff}---\na: 1\n---\nbody";
        assert_eq!(Document::new(text).body(), "body");
    }

    #[test]
    fn guard_clamps_into_body() {
        let doc = Document::new("---\na: 1\n---\nbody");
        let fm = doc.frontmatter_end();
        assert_eq!(doc.guard(0, 2), (fm, fm));
        assert_eq!(doc.guard(1, fm + 2), (fm, fm + 2));
        assert_eq!(doc.guard(fm + 1, fm + 3), (fm + 1, fm + 3));
    }

    #[test]
    fn whitespace_body_counts_as_empty() {
        assert!(Document::new("---\na: 1\n---\n\n  \n").body_is_empty());
        assert!(!Document::new("---\na: 1\n---\nx").body_is_empty());
    }
}
