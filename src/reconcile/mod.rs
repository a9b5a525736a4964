//! Identity reconciliation between `app.json` and the remote EAS project.
//!
//! Every run re-verifies a locally stored project id against the remote
//! record. [`decide`] is a pure function from the local identity and the
//! result of the remote lookup to a [`ReconciliationOutcome`];
//! [`Reconciler`] performs the lookup, applies the decided corrective
//! action, and reports it on the progress stream.
//!
//! Corrective actions always clear a stale id (and persist that) before
//! asking the remote service to link the project again, so `app.json`
//! never points at a remote project it does not match.

use thiserror::Error;
use tracing::{info, warn};

use crate::progress::Progress;
use crate::project::{ConfigError, IdentityStore, ProjectIdentity};
use crate::remote::{QueryError, RemoteProjectRecord};
use crate::runner::CommandFailure;

mod outcome;

pub use outcome::ReconciliationOutcome;

/// Result of querying the remote project record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RemoteLookup {
    /// No query was made because the project is not linked locally.
    NotQueried,
    /// The query call failed.
    Failed {
        /// Description of the failure.
        reason: String,
    },
    /// The query succeeded.
    Found(RemoteProjectRecord),
}

/// Remote operations needed to verify and repair the link.
pub trait LinkService {
    /// Fetches the remote record of the linked project.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the remote call fails.
    fn fetch_project_info(&self) -> Result<RemoteProjectRecord, QueryError>;

    /// Creates or links the remote project for the local declaration.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the remote call fails.
    fn initialize_project(&self, force_non_interactive: bool) -> Result<(), CommandFailure>;
}

/// Errors that abort reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Raised when the local identity cannot be read or written.
    #[error(transparent)]
    Identity(#[from] ConfigError),
    /// Raised when linking the project fails.
    #[error("failed to initialise the EAS project: {0}")]
    Initialize(#[source] CommandFailure),
}

/// Decides the reconciliation outcome for `identity` given `lookup`.
///
/// A remote record without an id is inconclusive rather than a mismatch.
/// The slug check only applies when the remote full name contains a `/`.
#[must_use]
pub fn decide(identity: &ProjectIdentity, lookup: &RemoteLookup) -> ReconciliationOutcome {
    let Some(local_id) = identity.remote_project_id.as_deref() else {
        return ReconciliationOutcome::NeedsInitialLink;
    };

    let record = match lookup {
        RemoteLookup::NotQueried => {
            return ReconciliationOutcome::NeedsRelinkQueryFailed {
                reason: String::from("project info was not queried"),
            };
        }
        RemoteLookup::Failed { reason } => {
            return ReconciliationOutcome::NeedsRelinkQueryFailed {
                reason: reason.clone(),
            };
        }
        RemoteLookup::Found(record) => record,
    };

    if let Some(remote_id) = record
        .remote_id
        .as_deref()
        .filter(|remote_id| !remote_id.is_empty() && *remote_id != local_id)
    {
        return ReconciliationOutcome::NeedsRelinkIdMismatch {
            local_id: local_id.to_owned(),
            remote_id: remote_id.to_owned(),
        };
    }

    if record
        .derived_slug()
        .is_some_and(|remote_slug| remote_slug != identity.slug)
    {
        return ReconciliationOutcome::NeedsRelinkSlugMismatch {
            full_name: record.full_name.clone().unwrap_or_default(),
            local_slug: identity.slug.clone(),
        };
    }

    ReconciliationOutcome::AlreadyLinked {
        full_name: record.full_name.clone(),
        remote_id: record.remote_id.clone(),
    }
}

/// Verifies the project link and repairs it when it has drifted.
#[derive(Debug)]
pub struct Reconciler<S: IdentityStore, L: LinkService> {
    store: S,
    link: L,
    progress: Progress,
}

impl<S: IdentityStore, L: LinkService> Reconciler<S, L> {
    /// Creates a reconciler over the given identity store and link service.
    #[must_use]
    pub const fn new(store: S, link: L, progress: Progress) -> Self {
        Self {
            store,
            link,
            progress,
        }
    }

    /// Runs one reconciliation pass and returns the decided outcome.
    ///
    /// A failed project-info query is reported and treated as a reason to
    /// link again; it never aborts the pass.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError`] when the identity cannot be loaded or
    /// persisted, or when linking fails.
    pub fn reconcile(&self) -> Result<ReconciliationOutcome, ReconcileError> {
        let identity = self.store.load_identity()?;
        let lookup = self.lookup(&identity);
        let outcome = decide(&identity, &lookup);
        info!(?outcome, slug = %identity.slug, "reconciliation decided");
        self.progress.line(&outcome);

        if outcome.clears_local_id() {
            self.store.persist(&identity.unlinked())?;
        }
        if outcome.requires_link() {
            self.link
                .initialize_project(true)
                .map_err(ReconcileError::Initialize)?;
        }
        Ok(outcome)
    }

    fn lookup(&self, identity: &ProjectIdentity) -> RemoteLookup {
        if identity.remote_project_id.is_none() {
            return RemoteLookup::NotQueried;
        }
        match self.link.fetch_project_info() {
            Ok(record) => RemoteLookup::Found(record),
            Err(err) => {
                warn!(error = %err, "project info query failed");
                RemoteLookup::Failed {
                    reason: err.failure().to_string(),
                }
            }
        }
    }
}
