//! Core library for the `shipwright` Expo build tool.
//!
//! The crate checks an Expo project's local configuration and tooling,
//! verifies that `app.json` is linked to the right EAS project (repairing
//! the link when it has drifted), and then dispatches an `eas build`.
//! External commands run through the [`CommandRunner`] abstraction so every
//! stage can be exercised without spawning processes.

pub mod config;
pub mod dispatch;
pub mod pipeline;
pub mod progress;
pub mod project;
pub mod reconcile;
pub mod remote;
pub mod runner;
pub mod test_support;
pub mod toolchain;

pub use config::{SettingsError, ShipwrightConfig};
pub use dispatch::{
    BuildDispatcher, BuildRequest, BuildService, NON_INTERACTIVE_FLAG, PASS_THROUGH_SEPARATOR,
    Platform,
};
pub use pipeline::{BuildOptions, BuildPipeline, PipelineError};
pub use progress::{CapturedProgress, Progress};
pub use project::{
    APP_JSON, ConfigError, EAS_JSON, IdentityStore, PACKAGE_JSON, Project, ProjectIdentity,
    ProjectSummary,
};
pub use reconcile::{
    LinkService, ReconcileError, Reconciler, ReconciliationOutcome, RemoteLookup, decide,
};
pub use remote::{AuthError, EasCli, QueryError, RemoteProjectRecord, RemoteSession};
pub use runner::{
    CommandEnv, CommandExecutor, CommandFailure, CommandOutput, CommandRunner, CommandSpec,
    OutputMode, ProcessCommandRunner,
};
pub use toolchain::{
    DependencyManager, ExecutableLocator, NpmDependencies, PathLocator, ToolError,
    require_executable,
};
