//! Command specifications and the runner abstraction.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use shell_escape::unix::escape;

use super::CommandFailure;

/// Environment overrides applied on top of the ambient process environment.
///
/// The value is threaded explicitly through every [`CommandSpec`] so callers
/// never mutate the global environment of the running process.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandEnv {
    overrides: BTreeMap<String, String>,
}

impl CommandEnv {
    /// No overrides: children see the ambient environment unchanged.
    #[must_use]
    pub fn inherit() -> Self {
        Self::default()
    }

    /// Overrides used for non-interactive runs: `CI=1` and no colour.
    #[must_use]
    pub fn plain() -> Self {
        Self::inherit().with("CI", "1").with("FORCE_COLOR", "0")
    }

    /// Picks [`CommandEnv::inherit`] for interactive runs and
    /// [`CommandEnv::plain`] otherwise.
    #[must_use]
    pub fn for_mode(interactive: bool) -> Self {
        if interactive {
            Self::inherit()
        } else {
            Self::plain()
        }
    }

    /// Adds or replaces a single override.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Looks up an override by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str)
    }

    /// Returns `true` when no overrides are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Iterates over overrides in key order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// A fully described external command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSpec {
    program: String,
    args: Vec<OsString>,
    working_dir: Option<Utf8PathBuf>,
    env: CommandEnv,
}

impl CommandSpec {
    /// Starts a specification for `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: CommandEnv::inherit(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments in order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory of the child.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Sets the environment overrides of the child.
    #[must_use]
    pub fn env(mut self, env: CommandEnv) -> Self {
        self.env = env;
        self
    }

    /// Program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Working directory, when one was set.
    #[must_use]
    pub fn working_dir(&self) -> Option<&Utf8Path> {
        self.working_dir.as_deref()
    }

    /// Environment overrides.
    #[must_use]
    pub const fn environment(&self) -> &CommandEnv {
        &self.env
    }

    /// Renders the command line with POSIX shell quoting.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut rendered = escape(self.program.as_str().into()).into_owned();
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(escape(arg.to_string_lossy()).as_ref());
        }
        rendered
    }
}

/// How the child's standard streams are handled.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputMode {
    /// The child inherits stdout and stderr; nothing is captured.
    Stream,
    /// Stdout and stderr are collected into [`CommandOutput`].
    Capture,
}

/// Result of running an external command.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandOutput {
    /// Exit code reported by the process, if available.
    pub code: Option<i32>,
    /// Captured standard output (empty when streamed).
    pub stdout: String,
    /// Captured standard error (empty when streamed).
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the exit code equals zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Abstraction over command execution to support fakes in tests.
pub trait CommandRunner {
    /// Runs `spec`, blocking until the child exits.
    ///
    /// A non-zero exit is reported through [`CommandOutput::code`], not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure::NotFound`] when the program does not exist
    /// and [`CommandFailure::Spawn`] when it cannot be started.
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, CommandFailure>;
}

/// Real command runner that shells out to the host operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessCommandRunner;

impl CommandRunner for ProcessCommandRunner {
    fn run(&self, spec: &CommandSpec, mode: OutputMode) -> Result<CommandOutput, CommandFailure> {
        let mut command = Command::new(spec.program());
        command.args(spec.arguments()).envs(spec.environment().overrides());
        if let Some(dir) = spec.working_dir() {
            command.current_dir(dir);
        }

        match mode {
            OutputMode::Capture => {
                let output = command
                    .output()
                    .map_err(|err| CommandFailure::from_spawn_error(spec, &err))?;
                Ok(CommandOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            OutputMode::Stream => {
                let status = command
                    .status()
                    .map_err(|err| CommandFailure::from_spawn_error(spec, &err))?;
                Ok(CommandOutput {
                    code: status.code(),
                    ..CommandOutput::default()
                })
            }
        }
    }
}
