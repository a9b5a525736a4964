//! External command execution.
//!
//! Every child process goes through a [`CommandRunner`]. The
//! [`CommandExecutor`] wrapper echoes the expanded command line to the
//! progress stream before running it and turns unsuccessful exits into
//! [`CommandFailure`] values. Execution is synchronous and never retried.

use tracing::debug;

use crate::progress::Progress;

mod error;
mod types;

pub use error::{CommandFailure, MAX_DIAGNOSTIC_CHARS, summarise_diagnostic};
pub use types::{
    CommandEnv, CommandOutput, CommandRunner, CommandSpec, OutputMode, ProcessCommandRunner,
};

/// Runs commands through a [`CommandRunner`] and reports them on the
/// progress stream.
#[derive(Clone, Debug)]
pub struct CommandExecutor<R: CommandRunner> {
    runner: R,
    progress: Progress,
}

impl CommandExecutor<ProcessCommandRunner> {
    /// Convenience constructor that wires the real process runner.
    #[must_use]
    pub const fn with_process_runner(progress: Progress) -> Self {
        Self::new(ProcessCommandRunner, progress)
    }
}

impl<R: CommandRunner> CommandExecutor<R> {
    /// Creates an executor around `runner`.
    #[must_use]
    pub const fn new(runner: R, progress: Progress) -> Self {
        Self { runner, progress }
    }

    /// Progress stream used for command echoes.
    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Runs `spec` with inherited output streams.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the command cannot start or exits
    /// unsuccessfully.
    pub fn run(&self, spec: &CommandSpec) -> Result<(), CommandFailure> {
        self.execute(spec, OutputMode::Stream).map(|_| ())
    }

    /// Runs `spec` and returns its captured standard output.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the command cannot start or exits
    /// unsuccessfully; the failure carries a summary of the captured output.
    pub fn run_capture(&self, spec: &CommandSpec) -> Result<String, CommandFailure> {
        self.execute(spec, OutputMode::Capture)
            .map(|output| output.stdout)
    }

    fn execute(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, CommandFailure> {
        let command_line = spec.command_line();
        self.progress.line(format_args!("+ {command_line}"));
        debug!(
            program = spec.program(),
            ?mode,
            overrides = !spec.environment().is_empty(),
            "running command"
        );

        let output = self.runner.run(spec, mode)?;
        if output.is_success() {
            return Ok(output);
        }

        let failure = CommandFailure::from_output(command_line, &output);
        debug!(%failure, "command failed");
        Err(failure)
    }
}
