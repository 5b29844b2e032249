// `docplace apply` — resolve and apply a batch of edit operations.

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use docplace_engine::apply::{apply_batch, Acceptance, BatchOutcome, BatchPolicy, BatchReport};
use docplace_engine::EditOperation;

use crate::config::CliConfig;
use crate::exit_code::ExitCode;
use crate::output::{self, OutputFormat};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Document path.
    pub doc: PathBuf,

    /// JSON file holding an array of operations.
    #[arg(long)]
    ops_file: PathBuf,

    /// Batch ordering policy (defaults to the configured policy).
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Minimum confidence for an operation to be applied.
    #[arg(long)]
    min_confidence: Option<f64>,

    /// Write the updated document back instead of printing it.
    #[arg(long)]
    write: bool,

    /// Config file (defaults to `~/.docplace/config.toml`).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force JSON output.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    Sequential,
    Snapshot,
}

impl From<PolicyArg> for BatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Sequential => BatchPolicy::Sequential,
            PolicyArg::Snapshot => BatchPolicy::SnapshotDescending,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOutput {
    pub doc_path: String,
    pub policy: BatchPolicy,
    pub written: bool,
    pub report: BatchReport,
}

pub fn run(args: ApplyArgs) -> anyhow::Result<ExitCode> {
    let format = OutputFormat::detect(args.json);
    match execute(args) {
        Ok(applied) => {
            let skipped = applied.report.outcomes.len() - applied.report.applied_count();
            if applied.written && skipped > 0 {
                output::print_warning(
                    format,
                    "OPERATIONS_SKIPPED",
                    &format!(
                        "{skipped} of {} operations were not applied",
                        applied.report.outcomes.len()
                    ),
                );
            }
            output::print_output(format, &applied, format_human)?;
            Ok(ExitCode::from_acceptances(
                applied.report.outcomes.iter().map(|outcome| outcome.acceptance),
            ))
        }
        Err(e) => {
            output::print_anyhow_error(format, &e);
            Err(e)
        }
    }
}

fn execute(args: ApplyArgs) -> anyhow::Result<ApplyOutput> {
    let config = CliConfig::load(args.config.as_deref())?;
    if let Some(min) = args.min_confidence {
        anyhow::ensure!((0.0..=1.0).contains(&min), "--min-confidence must be within [0, 1]");
    }
    let ops = read_operations(&args.ops_file)?;
    let text = super::read_document(&args.doc)?;

    let policy = args.policy.map(BatchPolicy::from).unwrap_or(config.apply.policy);
    let acceptance = config.acceptance(args.min_confidence);
    let report = apply_batch(&text, &ops, policy, &config.resolver, &acceptance);
    tracing::debug!(
        ops = ops.len(),
        applied = report.applied_count(),
        policy = ?policy,
        "batch applied"
    );

    let written = args.write && report.applied_count() > 0;
    if written {
        std::fs::write(&args.doc, &report.text)
            .with_context(|| format!("failed to write document `{}`", args.doc.display()))?;
    }

    Ok(ApplyOutput { doc_path: args.doc.display().to_string(), policy, written, report })
}

fn read_operations(path: &Path) -> anyhow::Result<Vec<EditOperation>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read operations file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("invalid operations in `{}`", path.display()))
}

fn format_outcome(outcome: &BatchOutcome) -> String {
    let result = &outcome.result;
    let status = match outcome.acceptance {
        Acceptance::Unplaced => return format!("#{} unplaced", outcome.index),
        Acceptance::NeedsConfirmation => "needs confirmation",
        Acceptance::Accepted if outcome.applied => "applied",
        Acceptance::Accepted => "skipped",
    };
    let strategy = result.strategy.map(|s| s.as_str()).unwrap_or("-");
    let mut line = format!(
        "#{} {status} [{}..{}) via {strategy} (confidence {:.2})",
        outcome.index, result.start, result.end, result.confidence
    );
    if let Some(error) = &outcome.error {
        line.push_str(&format!(": {error}"));
    }
    line
}

fn format_human(applied: &ApplyOutput) -> String {
    let report = &applied.report;
    let mut lines: Vec<String> = report.outcomes.iter().map(format_outcome).collect();
    lines.push(format!(
        "applied {} of {} operations to {}",
        report.applied_count(),
        report.outcomes.len(),
        applied.doc_path
    ));
    if !applied.written {
        lines.push(String::new());
        lines.push(report.text.trim_end_matches('\n').to_string());
    }
    lines.join("\n")
}
