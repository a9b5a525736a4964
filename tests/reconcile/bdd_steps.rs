//! BDD step definitions for EAS project link reconciliation.

use rstest_bdd_macros::{given, then, when};
use serde_json::json;
use shipwright::Reconciler;

use super::test_helpers::{ReconcileContext, ReconcileTestError, outcome_name};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] ReconcileTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("an unlinked app.json with slug \"{slug}\"")]
fn unlinked_app_json(reconcile_context: &ReconcileContext, slug: String) -> Result<(), StepError> {
    reconcile_context.write_app_json(&json!({ "expo": { "slug": slug.trim() } }))?;
    Ok(())
}

#[given("an app.json with slug \"{slug}\" linked to project \"{project_id}\"")]
fn linked_app_json(
    reconcile_context: &ReconcileContext,
    slug: String,
    project_id: String,
) -> Result<(), StepError> {
    reconcile_context.write_app_json(&json!({
        "expo": {
            "slug": slug.trim(),
            "extra": { "eas": { "projectId": project_id.trim() } }
        }
    }))?;
    Ok(())
}

#[given("the remote project is \"{full_name}\" with id \"{remote_id}\"")]
fn remote_project(reconcile_context: &ReconcileContext, full_name: String, remote_id: String) {
    reconcile_context.runner.push_stdout(format!(
        "fullName  {}\nID        {}\n",
        full_name.trim(),
        remote_id.trim()
    ));
}

#[given("the project info query fails with exit code \"{code}\"")]
fn project_info_fails(reconcile_context: &ReconcileContext, code: i32) {
    reconcile_context.runner.push_failure(code);
}

#[given("EAS init succeeds")]
fn init_succeeds(reconcile_context: &ReconcileContext) {
    reconcile_context.runner.push_success();
}

#[given("EAS init fails with exit code \"{code}\"")]
fn init_fails(reconcile_context: &ReconcileContext, code: i32) {
    reconcile_context.runner.push_failure(code);
}

#[when("I reconcile the project link")]
fn reconcile(reconcile_context: &ReconcileContext) {
    let session = reconcile_context.session();
    let reconciler = Reconciler::new(
        reconcile_context.project(),
        &session,
        reconcile_context.progress.clone(),
    );
    let result = reconciler.reconcile().map_err(|err| err.to_string());
    reconcile_context.result.replace(Some(result));
}

#[then("the outcome is \"{expected}\"")]
fn outcome_is(reconcile_context: &ReconcileContext, expected: String) -> Result<(), StepError> {
    match reconcile_context.result.borrow().as_ref() {
        Some(Ok(outcome)) if outcome_name(outcome) == expected.trim() => Ok(()),
        Some(Ok(outcome)) => Err(StepError::Assertion(format!(
            "expected {expected}, got {outcome:?}"
        ))),
        Some(Err(message)) => Err(StepError::Assertion(format!(
            "expected {expected}, got error: {message}"
        ))),
        None => Err(StepError::Assertion(String::from(
            "reconciliation has not run",
        ))),
    }
}

#[then("reconciliation fails with \"{fragment}\"")]
fn reconciliation_fails(
    reconcile_context: &ReconcileContext,
    fragment: String,
) -> Result<(), StepError> {
    match reconcile_context.result.borrow().as_ref() {
        Some(Err(message)) if message.contains(fragment.trim()) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure containing {fragment:?}, got {other:?}"
        ))),
    }
}

#[then("the EAS commands were \"{commands}\"")]
fn eas_commands(reconcile_context: &ReconcileContext, commands: String) -> Result<(), StepError> {
    let expected: Vec<String> = commands
        .split('|')
        .map(|command| command.trim().to_owned())
        .collect();
    let actual = reconcile_context.runner.command_strings();
    if actual == expected {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "expected commands {expected:?}, got {actual:?}"
    )))
}

#[then("app.json is unchanged")]
fn app_json_unchanged(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    let current = reconcile_context.raw_app_json()?;
    let original = reconcile_context.original_app_json.borrow().clone();
    if original.as_deref() == Some(current.as_str()) {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "app.json changed from {original:?} to {current:?}"
    )))
}

#[then("app.json has no extra object")]
fn no_extra_object(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    let document = reconcile_context.read_app_json()?;
    if document.pointer("/expo/extra").is_none() && document.pointer("/expo/slug").is_some() {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "expected expo.extra to be pruned: {document}"
    )))
}

#[then("app.json has no project id")]
fn no_project_id(reconcile_context: &ReconcileContext) -> Result<(), StepError> {
    let document = reconcile_context.read_app_json()?;
    if document.pointer("/expo/extra/eas/projectId").is_none() {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "expected projectId to be cleared: {document}"
    )))
}

#[then("app.json project id is \"{project_id}\"")]
fn project_id_is(reconcile_context: &ReconcileContext, project_id: String) -> Result<(), StepError> {
    let document = reconcile_context.read_app_json()?;
    let actual = document
        .pointer("/expo/extra/eas/projectId")
        .and_then(serde_json::Value::as_str);
    if actual == Some(project_id.trim()) {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "expected projectId {project_id}, got {actual:?}"
    )))
}

#[then("the progress output mentions \"{text}\"")]
fn progress_mentions(reconcile_context: &ReconcileContext, text: String) -> Result<(), StepError> {
    let contents = reconcile_context.captured.contents();
    if contents.contains(text.trim()) {
        return Ok(());
    }
    Err(StepError::Assertion(format!(
        "expected progress to mention {text:?}: {contents}"
    )))
}
