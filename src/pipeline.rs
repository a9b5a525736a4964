//! End-to-end build pipeline.
//!
//! Stages run strictly in order and the first failure skips every later
//! stage: layout check, project summary, profile validation, executable
//! checks, dependency installation, EAS CLI resolution, login check,
//! reconciliation, and build dispatch.

use thiserror::Error;
use tracing::info;

use crate::config::ShipwrightConfig;
use crate::dispatch::{BuildDispatcher, BuildRequest, Platform};
use crate::project::{ConfigError, Project};
use crate::reconcile::{ReconcileError, Reconciler, ReconciliationOutcome};
use crate::remote::{AuthError, EasCli, RemoteSession};
use crate::runner::{CommandEnv, CommandExecutor, CommandFailure, CommandRunner};
use crate::toolchain::{
    DependencyManager, ExecutableLocator, NpmDependencies, ToolError, require_executable,
};

/// Per-invocation options from the command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BuildOptions {
    /// Target platform.
    pub platform: Platform,
    /// Build profile; the configured default when `None`.
    pub profile: Option<String>,
    /// Reinstall dependencies even when `node_modules` exists.
    pub force_install: bool,
    /// Leave prompts, spinners and colour enabled.
    pub interactive: bool,
    /// Arguments passed through to `eas build`.
    pub extra_args: Vec<String>,
}

/// Errors that abort the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Local project files are missing, malformed or incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A required executable is missing.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// Dependency installation failed.
    #[error("failed to install JavaScript dependencies: {0}")]
    Dependencies(#[source] CommandFailure),
    /// The EAS login check failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// The project link could not be verified or repaired.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
    /// The build command failed.
    #[error("EAS build failed: {0}")]
    Build(#[source] CommandFailure),
}

/// Runs the build pipeline for one project.
#[derive(Debug)]
pub struct BuildPipeline<R: CommandRunner + Clone, L: ExecutableLocator> {
    project: Project,
    config: ShipwrightConfig,
    executor: CommandExecutor<R>,
    locator: L,
}

impl<R: CommandRunner + Clone, L: ExecutableLocator> BuildPipeline<R, L> {
    /// Creates a pipeline with injected collaborators.
    #[must_use]
    pub const fn new(
        project: Project,
        config: ShipwrightConfig,
        executor: CommandExecutor<R>,
        locator: L,
    ) -> Self {
        Self {
            project,
            config,
            executor,
            locator,
        }
    }

    /// Runs every stage and returns the reconciliation outcome.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`] raised by any stage.
    pub fn run(&self, options: &BuildOptions) -> Result<ReconciliationOutcome, PipelineError> {
        let progress = self.executor.progress();
        self.project.ensure_layout()?;
        progress.line(self.project.summary()?);

        let profile = options
            .profile
            .clone()
            .unwrap_or_else(|| self.config.default_profile.clone());
        self.project.validate_profile(&profile)?;

        require_executable(&self.locator, &self.config.node_bin)?;
        require_executable(&self.locator, &self.config.npm_bin)?;

        let env = CommandEnv::for_mode(options.interactive);
        NpmDependencies::new(
            self.executor.clone(),
            self.project.clone(),
            self.config.npm_bin.as_str(),
            env.clone(),
        )
        .install(options.force_install)
        .map_err(PipelineError::Dependencies)?;

        let cli = EasCli::resolve(&self.locator, &self.config)?;
        let session = RemoteSession::new(self.executor.clone(), cli, self.project.root(), env)
            .with_structured_output(self.config.project_info_json);

        let user = session.authenticate()?;
        info!(user = %user, "EAS login verified");

        let outcome =
            Reconciler::new(self.project.clone(), &session, progress.clone()).reconcile()?;

        let request = BuildRequest {
            platform: options.platform,
            profile,
            extra_args: options.extra_args.clone(),
            interactive: options.interactive,
        };
        BuildDispatcher::new(&session)
            .dispatch(&request)
            .map_err(PipelineError::Build)?;
        Ok(outcome)
    }
}
