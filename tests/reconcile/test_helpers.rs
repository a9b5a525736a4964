//! Shared fixtures for reconciliation BDD scenarios.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use rstest::fixture;
use shipwright::test_support::ScriptedRunner;
use shipwright::{
    APP_JSON, CapturedProgress, CommandEnv, CommandExecutor, EasCli, Progress, Project,
    ReconciliationOutcome, RemoteSession,
};
use tempfile::TempDir;
use thiserror::Error;

/// Result of the reconciliation step: the outcome or the rendered error.
pub type ReconcileResult = Result<ReconciliationOutcome, String>;

pub struct ReconcileContext {
    _workspace: TempDir,
    pub root: Utf8PathBuf,
    pub runner: ScriptedRunner,
    pub progress: Progress,
    pub captured: CapturedProgress,
    pub original_app_json: RefCell<Option<String>>,
    pub result: RefCell<Option<ReconcileResult>>,
}

#[derive(Debug, Error)]
pub enum ReconcileTestError {
    #[error("fixture I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid reconcile fixture: {0}")]
    Fixture(String),
}

#[fixture]
pub fn reconcile_context() -> ReconcileContext {
    build_context().unwrap_or_else(|err| panic!("reconcile context should initialise: {err}"))
}

fn build_context() -> Result<ReconcileContext, ReconcileTestError> {
    let workspace = TempDir::new()?;
    let root = Utf8PathBuf::from_path_buf(workspace.path().to_path_buf())
        .map_err(|path| ReconcileTestError::Fixture(format!("non-UTF-8 path {}", path.display())))?;
    let (progress, captured) = Progress::captured();
    Ok(ReconcileContext {
        _workspace: workspace,
        root,
        runner: ScriptedRunner::new(),
        progress,
        captured,
        original_app_json: RefCell::new(None),
        result: RefCell::new(None),
    })
}

impl ReconcileContext {
    pub fn project(&self) -> Project {
        Project::new(self.root.clone())
    }

    pub fn session(&self) -> RemoteSession<ScriptedRunner> {
        RemoteSession::new(
            CommandExecutor::new(self.runner.clone(), self.progress.clone()),
            EasCli::installed("eas"),
            self.root.clone(),
            CommandEnv::plain(),
        )
    }

    pub fn write_app_json(&self, document: &serde_json::Value) -> Result<(), ReconcileTestError> {
        let contents = serde_json::to_string(document)
            .map_err(|err| ReconcileTestError::Fixture(err.to_string()))?;
        std::fs::write(self.root.join(APP_JSON), &contents)?;
        self.original_app_json.replace(Some(contents));
        Ok(())
    }

    pub fn read_app_json(&self) -> Result<serde_json::Value, ReconcileTestError> {
        let contents = std::fs::read_to_string(self.root.join(APP_JSON))?;
        serde_json::from_str(&contents).map_err(|err| ReconcileTestError::Fixture(err.to_string()))
    }

    pub fn raw_app_json(&self) -> Result<String, ReconcileTestError> {
        Ok(std::fs::read_to_string(self.root.join(APP_JSON))?)
    }
}

/// Variant name used in feature files.
pub const fn outcome_name(outcome: &ReconciliationOutcome) -> &'static str {
    match outcome {
        ReconciliationOutcome::AlreadyLinked { .. } => "AlreadyLinked",
        ReconciliationOutcome::NeedsInitialLink => "NeedsInitialLink",
        ReconciliationOutcome::NeedsRelinkIdMismatch { .. } => "NeedsRelinkIdMismatch",
        ReconciliationOutcome::NeedsRelinkSlugMismatch { .. } => "NeedsRelinkSlugMismatch",
        ReconciliationOutcome::NeedsRelinkQueryFailed { .. } => "NeedsRelinkQueryFailed",
    }
}
