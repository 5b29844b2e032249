// `docplace outline` — show what the anchor resolver sees in a document.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use docplace_engine::outline::{outline, Heading};
use docplace_engine::Document;

use crate::exit_code::ExitCode;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct OutlineArgs {
    /// Document path.
    pub doc: PathBuf,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineOutput {
    pub doc_path: String,
    pub frontmatter_end: usize,
    pub len: usize,
    pub headings: Vec<Heading>,
}

pub fn run(args: OutlineArgs) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::detect(args.json);
    match execute(&args) {
        Ok(result) => {
            output::print_output(format, &result, format_human)?;
            Ok(ExitCode::Success)
        }
        Err(e) => {
            output::print_anyhow_error(format, &e);
            Err(e)
        }
    }
}

fn execute(args: &OutlineArgs) -> anyhow::Result<OutlineOutput> {
    let text = super::read_document(&args.doc)?;
    let doc = Document::new(&text);
    Ok(OutlineOutput {
        doc_path: args.doc.display().to_string(),
        frontmatter_end: doc.frontmatter_end(),
        len: doc.len(),
        headings: outline(&doc),
    })
}

fn format_human(result: &OutlineOutput) -> String {
    let mut lines = vec![format!(
        "{} ({} bytes, body starts at {})",
        result.doc_path, result.len, result.frontmatter_end
    )];
    if result.headings.is_empty() {
        lines.push("  (no headings)".to_string());
    }
    for heading in &result.headings {
        let indent = "  ".repeat(usize::from(heading.level));
        lines.push(format!(
            "{indent}{} {} @{}",
            "#".repeat(usize::from(heading.level)),
            heading.text,
            heading.start
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_skips_frontmatter_and_code_fences() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = dir.path().join("spec.md");
        std::fs::write(&doc, "---\ntitle: S\n---\n# Top\n```\n# not a heading\n```\n## Sub\n")
            .unwrap();

        let result = execute(&OutlineArgs { doc, json: true }).unwrap();
        assert_eq!(result.frontmatter_end, 17);
        let titles: Vec<(u8, &str)> =
            result.headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(titles, vec![(1, "Top"), (2, "Sub")]);
        assert_eq!(result.headings[0].start, 17);
    }

    #[test]
    fn human_format_indents_by_level() {
        let result = OutlineOutput {
            doc_path: "spec.md".into(),
            frontmatter_end: 0,
            len: 20,
            headings: vec![
                Heading { level: 1, start: 0, line_end: 5, text: "Top".into() },
                Heading { level: 2, start: 6, line_end: 12, text: "Sub".into() },
            ],
        };
        let text = format_human(&result);
        assert!(text.contains("\n  # Top @0"));
        assert!(text.contains("\n    ## Sub @6"));
    }

    #[test]
    fn missing_document_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = OutlineArgs { doc: dir.path().join("absent.md"), json: true };
        assert!(execute(&args).is_err());
    }
}
