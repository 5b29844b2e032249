// `docplace resolve` — place one edit operation without changing the file.

use anyhow::Context;
use clap::{ArgGroup, Args};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use docplace_engine::apply::Acceptance;
use docplace_engine::{resolve, EditOperation, ResolutionResult, Selection};

use crate::config::CliConfig;
use crate::exit_code::ExitCode;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("op_source").required(true).args(["op", "op_file"])))]
pub struct ResolveArgs {
    /// Document path.
    pub doc: PathBuf,

    /// Operation as inline JSON (e.g. `{"kind":"replace_range",...}`).
    #[arg(long)]
    op: Option<String>,

    /// Read the operation JSON from a file.
    #[arg(long)]
    op_file: Option<PathBuf>,

    /// Current selection as `START:END` byte offsets.
    #[arg(long, value_parser = parse_selection)]
    selection: Option<Selection>,

    /// Byte offset of the cursor, used to prefer nearby matches.
    #[arg(long)]
    cursor: Option<usize>,

    /// Config file (defaults to `~/.docplace/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveOutput {
    pub doc_path: String,
    pub result: ResolutionResult,
    pub acceptance: Acceptance,
}

pub fn run(args: ResolveArgs) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::detect(args.json);
    match execute(args) {
        Ok(resolved) => {
            output::print_output(format, &resolved, format_human)?;
            Ok(match resolved.acceptance {
                Acceptance::Accepted => ExitCode::Success,
                Acceptance::NeedsConfirmation => ExitCode::NeedsConfirmation,
                Acceptance::Unplaced => ExitCode::Unplaced,
            })
        }
        Err(e) => {
            output::print_anyhow_error(format, &e);
            Err(e)
        }
    }
}

fn execute(args: ResolveArgs) -> anyhow::Result<ResolveOutput> {
    let config = CliConfig::load(args.config.as_deref())?;
    let op = read_operation(args.op.as_deref(), args.op_file.as_deref())?;
    let text = super::read_document(&args.doc)?;

    let result = resolve(&text, &op, args.selection, args.cursor, &config.resolver);
    let acceptance = config.acceptance(None).classify(&result);
    Ok(ResolveOutput { doc_path: args.doc.display().to_string(), result, acceptance })
}

fn read_operation(
    inline: Option<&str>,
    file: Option<&std::path::Path>,
) -> anyhow::Result<EditOperation> {
    let raw = match (inline, file) {
        (Some(json), _) => json.to_string(),
        (_, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read operation file `{}`", path.display()))?,
        (None, None) => anyhow::bail!("either --op or --op-file is required"),
    };
    serde_json::from_str(&raw).context("invalid operation")
}

fn parse_selection(raw: &str) -> Result<Selection, String> {
    let (start, end) = raw.split_once(':').ok_or("expected START:END")?;
    let start: usize = start.trim().parse().map_err(|e| format!("bad start offset: {e}"))?;
    let end: usize = end.trim().parse().map_err(|e| format!("bad end offset: {e}"))?;
    if end < start {
        return Err(format!("selection end {end} is before start {start}"));
    }
    Ok(Selection::new(start, end))
}

fn format_human(resolved: &ResolveOutput) -> String {
    let result = &resolved.result;
    let Some(strategy) = result.strategy else {
        return format!("unplaced: no strategy could locate the operation in {}", resolved.doc_path);
    };
    let mut line = format!(
        "resolved [{}..{}) via {strategy} (confidence {:.2})",
        result.start, result.end, result.confidence
    );
    if resolved.acceptance == Acceptance::NeedsConfirmation {
        line.push_str(" - needs confirmation");
    }
    line
}
