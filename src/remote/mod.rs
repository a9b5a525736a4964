//! EAS CLI session: login check, project info, linking, and builds.
//!
//! Every call goes through the same [`EasCli`] prefix, which is either the
//! installed `eas` executable or `npx --yes eas-cli@latest`.

use std::ffi::OsString;

use camino::Utf8PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::config::ShipwrightConfig;
use crate::dispatch::BuildService;
use crate::reconcile::LinkService;
use crate::runner::{CommandEnv, CommandExecutor, CommandFailure, CommandRunner, CommandSpec};
use crate::toolchain::{ExecutableLocator, ToolError};

mod parse;

pub use parse::{RemoteProjectRecord, parse_project_info};

/// Errors raised while checking the logged-in EAS account.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Raised when `eas whoami` fails.
    #[error("not logged into Expo/EAS; run `eas login` and try again ({source})")]
    NotLoggedIn {
        /// Underlying command failure.
        #[source]
        source: CommandFailure,
    },
    /// Raised when `eas whoami` succeeds without naming an account.
    #[error("unable to determine the Expo username; run `eas whoami` to debug")]
    EmptyIdentity,
}

/// Raised when `eas project:info` fails.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unable to read project info: {failure}")]
pub struct QueryError {
    #[source]
    failure: CommandFailure,
}

impl QueryError {
    /// Wraps the failed command.
    #[must_use]
    pub const fn new(failure: CommandFailure) -> Self {
        Self { failure }
    }

    /// The failed command.
    #[must_use]
    pub const fn failure(&self) -> &CommandFailure {
        &self.failure
    }
}

/// Command prefix used to invoke the EAS CLI.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EasCli {
    program: String,
    prefix: Vec<OsString>,
}

impl EasCli {
    /// Invokes an installed `eas` executable directly.
    #[must_use]
    pub fn installed(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix: Vec::new(),
        }
    }

    /// Fetches and runs `package` through `npx --yes`.
    #[must_use]
    pub fn via_npx(npx: impl Into<String>, package: &str) -> Self {
        Self {
            program: npx.into(),
            prefix: vec![OsString::from("--yes"), OsString::from(package)],
        }
    }

    /// Prefers the configured `eas` binary and falls back to `npx`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::MissingExecutable`] naming `npx` when neither is
    /// on `PATH`.
    pub fn resolve<L: ExecutableLocator + ?Sized>(
        locator: &L,
        config: &ShipwrightConfig,
    ) -> Result<Self, ToolError> {
        if locator.locate(&config.eas_bin).is_some() {
            debug!(program = %config.eas_bin, "using installed EAS CLI");
            return Ok(Self::installed(config.eas_bin.as_str()));
        }
        crate::toolchain::require_executable(locator, &config.npx_bin)?;
        debug!(package = %config.eas_cli_package, "falling back to npx for the EAS CLI");
        Ok(Self::via_npx(config.npx_bin.as_str(), &config.eas_cli_package))
    }

    /// Builds a command running the CLI with `args`.
    #[must_use]
    pub fn command<I, S>(&self, args: I) -> CommandSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        CommandSpec::new(self.program.as_str())
            .args(self.prefix.iter().cloned())
            .args(args)
    }
}

/// Runs EAS CLI commands for one project.
#[derive(Clone, Debug)]
pub struct RemoteSession<R: CommandRunner> {
    executor: CommandExecutor<R>,
    cli: EasCli,
    project_root: Utf8PathBuf,
    env: CommandEnv,
    structured_output: bool,
}

impl<R: CommandRunner> RemoteSession<R> {
    /// Creates a session running `cli` inside `project_root` with `env`.
    #[must_use]
    pub fn new(
        executor: CommandExecutor<R>,
        cli: EasCli,
        project_root: impl Into<Utf8PathBuf>,
        env: CommandEnv,
    ) -> Self {
        Self {
            executor,
            cli,
            project_root: project_root.into(),
            env,
            structured_output: false,
        }
    }

    /// Requests JSON output from `eas project:info`.
    #[must_use]
    pub const fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    /// Returns the logged-in username.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotLoggedIn`] when `eas whoami` fails and
    /// [`AuthError::EmptyIdentity`] when it prints nothing.
    pub fn authenticate(&self) -> Result<String, AuthError> {
        let stdout = self
            .executor
            .run_capture(&self.spec(["whoami"]))
            .map_err(|source| AuthError::NotLoggedIn { source })?;
        let user = stdout.trim();
        if user.is_empty() {
            return Err(AuthError::EmptyIdentity);
        }
        Ok(user.to_owned())
    }

    /// Queries the remote record of the linked project.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when `eas project:info` fails. Output without
    /// the expected fields is not an error.
    pub fn fetch_project_info(&self) -> Result<RemoteProjectRecord, QueryError> {
        let mut args = vec!["project:info"];
        if self.structured_output {
            args.push("--json");
        }
        let stdout = self
            .executor
            .run_capture(&self.spec(args))
            .map_err(QueryError::new)?;
        let record = parse_project_info(&stdout);
        debug!(?record, "parsed project info");
        Ok(record)
    }

    /// Runs `eas init`, forced and non-interactive when requested.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when `eas init` fails.
    pub fn initialize_project(&self, force_non_interactive: bool) -> Result<(), CommandFailure> {
        let mut args = vec!["init"];
        if force_non_interactive {
            args.extend(["--force", "--non-interactive"]);
        }
        self.executor.run(&self.spec(args))
    }

    /// Runs `eas` with pre-assembled build arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the build command fails.
    pub fn run_build(&self, arguments: &[String]) -> Result<(), CommandFailure> {
        self.executor.run(&self.spec(arguments.iter().map(String::as_str)))
    }

    fn spec<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> CommandSpec {
        self.cli
            .command(args)
            .current_dir(self.project_root.clone())
            .env(self.env.clone())
    }
}

impl<R: CommandRunner> LinkService for &RemoteSession<R> {
    fn fetch_project_info(&self) -> Result<RemoteProjectRecord, QueryError> {
        RemoteSession::<R>::fetch_project_info(self)
    }

    fn initialize_project(&self, force_non_interactive: bool) -> Result<(), CommandFailure> {
        RemoteSession::<R>::initialize_project(self, force_non_interactive)
    }
}

impl<R: CommandRunner> BuildService for &RemoteSession<R> {
    fn start_build(&self, arguments: &[String]) -> Result<(), CommandFailure> {
        RemoteSession::<R>::run_build(self, arguments)
    }
}
