//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::rc::Rc;

use crate::runner::{CommandFailure, CommandOutput, CommandRunner, CommandSpec, OutputMode};
use crate::toolchain::ExecutableLocator;

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic command outcomes without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: Rc<RefCell<VecDeque<ScriptedResponse>>>,
    invocations: Rc<RefCell<Vec<CommandInvocation>>>,
}

#[derive(Clone, Debug)]
enum ScriptedResponse {
    Output(CommandOutput),
    NotFound,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Command as passed to the runner.
    pub spec: CommandSpec,
    /// Requested output handling.
    pub mode: OutputMode,
}

impl CommandInvocation {
    /// Returns the program and arguments joined by spaces, unquoted.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.spec.arguments().len() + 1);
        parts.push(self.spec.program().to_owned());
        parts.extend(
            self.spec
                .arguments()
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Returns the recorded invocations rendered with
    /// [`CommandInvocation::command_string`].
    #[must_use]
    pub fn command_strings(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(CommandInvocation::command_string)
            .collect()
    }

    /// Number of queued responses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.responses.borrow().len()
    }

    /// Pushes a successful exit status with no output.
    pub fn push_success(&self) {
        self.push_output(Some(0), "", "");
    }

    /// Pushes a successful exit status with the given stdout.
    pub fn push_stdout(&self, stdout: impl Into<String>) {
        self.push_output(Some(0), stdout, "");
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32) {
        self.push_output(Some(code), "", "simulated failure");
    }

    /// Pushes a missing-executable error.
    pub fn push_not_found(&self) {
        self.responses
            .borrow_mut()
            .push_back(ScriptedResponse::NotFound);
    }

    /// Pushes an explicit command output response.
    pub fn push_output(
        &self,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) {
        self.responses
            .borrow_mut()
            .push_back(ScriptedResponse::Output(CommandOutput {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            }));
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, CommandFailure> {
        self.invocations.borrow_mut().push(CommandInvocation {
            spec: spec.clone(),
            mode,
        });
        match self.responses.borrow_mut().pop_front() {
            Some(ScriptedResponse::Output(output)) => Ok(output),
            Some(ScriptedResponse::NotFound) => Err(CommandFailure::NotFound {
                program: spec.program().to_owned(),
                command_line: spec.command_line(),
            }),
            None => Err(CommandFailure::Spawn {
                command_line: spec.command_line(),
                message: String::from("no scripted response available"),
            }),
        }
    }
}

/// Executable locator that only knows a fixed set of names.
#[derive(Clone, Debug, Default)]
pub struct StaticLocator {
    available: BTreeSet<String>,
}

impl StaticLocator {
    /// Creates a locator that finds exactly `names`.
    #[must_use]
    pub fn with<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            available: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ExecutableLocator for StaticLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.available
            .contains(name)
            .then(|| PathBuf::from("/usr/bin").join(name))
    }
}
