// Consistent exit codes for the docplace CLI.
//
//   0  = success
//   1  = general error
//   2  = usage/argument error (including bad operations and config)
//   12 = at least one operation could not be placed
//   13 = at least one operation needs confirmation

use std::process;

use docplace_engine::apply::Acceptance;

use crate::config::ConfigError;

/// Named exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    Error = 1,
    Usage = 2,
    Unplaced = 12,
    NeedsConfirmation = 13,
}

impl ExitCode {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Map an anyhow error to an exit code by inspecting the error chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.downcast_ref::<ConfigError>().is_some()
                || cause.downcast_ref::<serde_json::Error>().is_some()
            {
                return Self::Usage;
            }
        }
        Self::Error
    }

    /// Worst outcome across a set of acceptances. Unplaced outranks
    /// needs-confirmation.
    pub fn from_acceptances(acceptances: impl IntoIterator<Item = Acceptance>) -> Self {
        acceptances.into_iter().fold(Self::Success, |worst, acceptance| {
            match (worst, acceptance) {
                (_, Acceptance::Unplaced) | (Self::Unplaced, _) => Self::Unplaced,
                (_, Acceptance::NeedsConfirmation) => Self::NeedsConfirmation,
                (current, Acceptance::Accepted) => current,
            }
        })
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code() as u8)
    }
}
