// Output format auto-detection for the CLI.
//
// TTY → human-readable text. Piped/redirected → structured JSON.
// `--json` flag forces JSON output regardless of terminal.

use serde::Serialize;
use std::io::{self, IsTerminal, Write};

use crate::config::ConfigError;

const ANSI_RED: &str = "\x1b[31m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_RESET: &str = "\x1b[0m";

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    Human,
    /// Machine-readable JSON (one object per response).
    Json,
}

impl OutputFormat {
    /// Auto-detect format: JSON if `--json` was passed or stdout is not a TTY.
    pub fn detect(json_flag: bool) -> Self {
        if json_flag {
            return Self::Json;
        }
        Self::detect_from_terminal(io::stdout().is_terminal())
    }

    /// Testable variant that takes an explicit `is_tty` flag.
    pub fn detect_from_terminal(is_tty: bool) -> Self {
        if is_tty {
            Self::Human
        } else {
            Self::Json
        }
    }
}

/// Write a value to stdout in the selected format.
pub fn print_output<T, F>(format: OutputFormat, value: &T, human_fn: F) -> io::Result<()>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    write_output(&mut io::stdout().lock(), format, value, human_fn)
}

/// Write a value to a provided writer.
pub fn write_output<W, T, F>(
    writer: &mut W,
    format: OutputFormat,
    value: &T,
    human_fn: F,
) -> io::Result<()>
where
    W: Write,
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", human_fn(value))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, value).map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

/// Write an error to stderr in the selected format.
pub fn print_error(format: OutputFormat, code: &str, message: &str) {
    print_diagnostic(format, "error", ANSI_RED, code, message);
}

/// Write a warning to stderr in the selected format.
pub fn print_warning(format: OutputFormat, code: &str, message: &str) {
    print_diagnostic(format, "warning", ANSI_YELLOW, code, message);
}

fn print_diagnostic(format: OutputFormat, label: &str, color: &str, code: &str, message: &str) {
    let is_tty = io::stderr().is_terminal();
    let diagnostic = Diagnostic { label, color, code, message };
    let _ = write_diagnostic(&mut io::stderr().lock(), format, is_tty, &diagnostic);
}

struct Diagnostic<'a> {
    label: &'a str,
    color: &'a str,
    code: &'a str,
    message: &'a str,
}

fn write_diagnostic<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    is_tty: bool,
    diagnostic: &Diagnostic<'_>,
) -> io::Result<()> {
    let Diagnostic { label, color, code, message } = *diagnostic;
    match format {
        OutputFormat::Human => {
            writeln!(writer, "{}", render_human_stderr_line(label, message, is_tty, color))
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut *writer, &diagnostic_json(label, code, message))
                .map_err(io::Error::other)?;
            writeln!(writer)
        }
    }
}

fn diagnostic_json(label: &str, code: &str, message: &str) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert(label.to_string(), serde_json::json!({ "code": code, "message": message }));
    serde_json::Value::Object(obj)
}

/// Print a mapped, actionable error for a command failure.
pub fn print_anyhow_error(format: OutputFormat, error: &anyhow::Error) {
    let (code, message) = actionable_error(error);
    print_error(format, code, &message);
}

fn actionable_error(error: &anyhow::Error) -> (&'static str, String) {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            let hint = match config_err {
                ConfigError::Invalid(_) => "Fix the value in the [resolver] or [apply] table",
                _ => "Check the file passed to --config or ~/.docplace/config.toml",
            };
            return ("CONFIG_INVALID", format!("{message}. {hint}."));
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return (
                "OPERATION_INVALID",
                format!(
                    "{message}. Operations are JSON objects with a snake_case `kind` \
                     (replace_range, delete_range, insert_after, insert_after_heading)."
                ),
            );
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return match io_err.kind() {
                io::ErrorKind::NotFound => ("FILE_NOT_FOUND", message),
                io::ErrorKind::PermissionDenied => ("PERMISSION_DENIED", message),
                _ => ("IO_ERROR", message),
            };
        }
    }

    ("ERROR", message)
}

fn render_human_stderr_line(label: &str, message: &str, is_tty: bool, color: &str) -> String {
    if is_tty {
        format!("{color}{label}:{ANSI_RESET} {message}")
    } else {
        format!("{label}: {message}")
    }
}
