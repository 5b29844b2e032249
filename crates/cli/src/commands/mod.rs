// CLI subcommand dispatch and shared file helpers.

use anyhow::Context;
use clap::Subcommand;
use std::path::Path;

use crate::exit_code::ExitCode;

pub mod apply;
pub mod outline;
pub mod resolve;

#[derive(Subcommand)]
pub enum Command {
    /// Resolve one edit operation to a byte range
    Resolve(resolve::ResolveArgs),
    /// Resolve and apply a batch of edit operations
    Apply(apply::ApplyArgs),
    /// Show the frontmatter boundary and heading outline
    Outline(outline::OutlineArgs),
}

pub fn run(cmd: Command) -> anyhow::Result<ExitCode> {
    match cmd {
        Command::Resolve(args) => resolve::run(args),
        Command::Apply(args) => apply::run(args),
        Command::Outline(args) => outline::run(args),
    }
}

fn read_document(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document `{}`", path.display()))
}
