//! BDD scenarios for EAS project link reconciliation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ReconcileContext, reconcile_context};

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Link a project that has never been linked"
)]
fn scenario_initial_link(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Keep a link that matches the remote project"
)]
fn scenario_already_linked(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Relink when the remote project id differs"
)]
fn scenario_id_mismatch(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Relink when the remote slug differs"
)]
fn scenario_slug_mismatch(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Relink without clearing when project info cannot be read"
)]
fn scenario_query_failed(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}

#[scenario(
    path = "tests/features/reconcile.feature",
    name = "Surface EAS init failures"
)]
fn scenario_init_failure(reconcile_context: ReconcileContext) {
    let _ = reconcile_context;
}
