//! Classification of failed command executions.

use std::io;

use thiserror::Error;

use super::{CommandOutput, CommandSpec};

/// Maximum number of characters kept from a child's diagnostic output.
pub const MAX_DIAGNOSTIC_CHARS: usize = 200;

/// Errors surfaced when an external command cannot run or fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CommandFailure {
    /// Raised when the executable does not exist.
    #[error("command not found: {program} (while running {command_line})")]
    NotFound {
        /// Program that could not be located.
        program: String,
        /// Rendered command line that was attempted.
        command_line: String,
    },
    /// Raised when the executable exists but could not be started.
    #[error("failed to start {command_line}: {message}")]
    Spawn {
        /// Rendered command line that was attempted.
        command_line: String,
        /// Operating system error string.
        message: String,
    },
    /// Raised when the command exits unsuccessfully.
    #[error(
        "command failed (exit {status_text}): {command_line}{suffix}",
        suffix = diagnostic_suffix(diagnostic.as_deref())
    )]
    Exit {
        /// Rendered command line that was attempted.
        command_line: String,
        /// Exit code reported by the OS, if any.
        code: Option<i32>,
        /// Human readable representation of the exit status.
        status_text: String,
        /// Trailing line of the child's diagnostic output, if any.
        diagnostic: Option<String>,
    },
}

impl CommandFailure {
    /// Maps a spawn error, distinguishing a missing executable.
    #[must_use]
    pub fn from_spawn_error(spec: &CommandSpec, err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            return Self::NotFound {
                program: spec.program().to_owned(),
                command_line: spec.command_line(),
            };
        }
        Self::Spawn {
            command_line: spec.command_line(),
            message: err.to_string(),
        }
    }

    /// Builds an exit failure from an unsuccessful output.
    #[must_use]
    pub fn from_output(command_line: String, output: &CommandOutput) -> Self {
        let status_text = output
            .code
            .map_or_else(|| String::from("unknown"), |code| code.to_string());
        Self::Exit {
            command_line,
            code: output.code,
            status_text,
            diagnostic: summarise_diagnostic(output),
        }
    }

    /// Rendered command line associated with the failure.
    #[must_use]
    pub fn command_line(&self) -> &str {
        match self {
            Self::NotFound { command_line, .. }
            | Self::Spawn { command_line, .. }
            | Self::Exit { command_line, .. } => command_line,
        }
    }
}

/// Reduces captured output to a one-line summary.
///
/// Stderr wins over stdout; the last non-empty line is kept and truncated to
/// [`MAX_DIAGNOSTIC_CHARS`].
#[must_use]
pub fn summarise_diagnostic(output: &CommandOutput) -> Option<String> {
    let stderr = output.stderr.trim();
    let text = if stderr.is_empty() {
        output.stdout.trim()
    } else {
        stderr
    };

    let line = text.lines().map(str::trim).rev().find(|line| !line.is_empty())?;
    Some(truncate_chars(line, MAX_DIAGNOSTIC_CHARS))
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_owned();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

fn diagnostic_suffix(diagnostic: Option<&str>) -> String {
    diagnostic.map_or_else(String::new, |text| format!(": {text}"))
}
