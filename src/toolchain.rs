//! Executable lookup and JavaScript dependency installation.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::progress::Progress;
use crate::project::Project;
use crate::runner::{CommandEnv, CommandExecutor, CommandFailure, CommandRunner, CommandSpec};

const NODE_MODULES_DIR: &str = "node_modules";
const PACKAGE_LOCK: &str = "package-lock.json";

/// Errors raised when required tooling is unavailable.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ToolError {
    /// Raised when an executable is not on `PATH`.
    #[error("required executable not found in PATH: {name}")]
    MissingExecutable {
        /// Executable name that was searched for.
        name: String,
    },
}

/// Finds executables by name.
pub trait ExecutableLocator {
    /// Returns the resolved path of `name`, or `None` when it is absent.
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Looks executables up on `PATH` with the `which` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathLocator;

impl ExecutableLocator for PathLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }
}

/// Locates `name` or fails.
///
/// # Errors
///
/// Returns [`ToolError::MissingExecutable`] when the locator cannot find it.
pub fn require_executable<L: ExecutableLocator + ?Sized>(
    locator: &L,
    name: &str,
) -> Result<PathBuf, ToolError> {
    let path = locator
        .locate(name)
        .ok_or_else(|| ToolError::MissingExecutable {
            name: name.to_owned(),
        })?;
    debug!(name, path = %path.display(), "located executable");
    Ok(path)
}

/// JavaScript dependency manager.
pub trait DependencyManager {
    /// Returns `true` when dependencies are already installed.
    fn deps_present(&self) -> bool;

    /// Installs dependencies. Without `force_reinstall`, an existing install
    /// is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the installer fails.
    fn install(&self, force_reinstall: bool) -> Result<(), CommandFailure>;
}

/// npm-backed [`DependencyManager`].
#[derive(Clone, Debug)]
pub struct NpmDependencies<R: CommandRunner> {
    executor: CommandExecutor<R>,
    project: Project,
    npm_bin: String,
    env: CommandEnv,
}

impl<R: CommandRunner> NpmDependencies<R> {
    /// Creates an installer for `project` using `npm_bin`.
    #[must_use]
    pub fn new(
        executor: CommandExecutor<R>,
        project: Project,
        npm_bin: impl Into<String>,
        env: CommandEnv,
    ) -> Self {
        Self {
            executor,
            project,
            npm_bin: npm_bin.into(),
            env,
        }
    }

    fn progress(&self) -> &Progress {
        self.executor.progress()
    }
}

impl<R: CommandRunner> DependencyManager for NpmDependencies<R> {
    fn deps_present(&self) -> bool {
        self.project.has_dir(NODE_MODULES_DIR)
    }

    fn install(&self, force_reinstall: bool) -> Result<(), CommandFailure> {
        if !force_reinstall && self.deps_present() {
            self.progress()
                .line("JS deps: node_modules already present (skipping install).");
            return Ok(());
        }

        // `npm ci` wipes node_modules itself, so a forced reinstall needs no
        // extra cleanup.
        let subcommand = if self.project.has_file(PACKAGE_LOCK) {
            "ci"
        } else {
            "install"
        };
        let spec = CommandSpec::new(self.npm_bin.as_str())
            .arg(subcommand)
            .current_dir(self.project.root())
            .env(self.env.clone());
        self.executor.run(&spec)
    }
}
