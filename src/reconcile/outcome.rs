//! Reconciliation outcomes and their progress messages.

use std::fmt::{self, Display};

/// Decision reached by [`super::decide`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ReconciliationOutcome {
    /// Local and remote identities agree.
    AlreadyLinked {
        /// Remote `<owner>/<slug>`, when reported.
        full_name: Option<String>,
        /// Remote project id, when reported.
        remote_id: Option<String>,
    },
    /// The project has never been linked.
    NeedsInitialLink,
    /// The stored id names a different remote project.
    NeedsRelinkIdMismatch {
        /// Id stored in `app.json`.
        local_id: String,
        /// Id reported by the remote service.
        remote_id: String,
    },
    /// The remote project's slug differs from the local slug.
    NeedsRelinkSlugMismatch {
        /// Remote `<owner>/<slug>`.
        full_name: String,
        /// Slug declared in `app.json`.
        local_slug: String,
    },
    /// The remote record could not be read.
    NeedsRelinkQueryFailed {
        /// Description of the failed query.
        reason: String,
    },
}

impl ReconciliationOutcome {
    /// Returns `true` when the stored remote id must be cleared before
    /// linking again.
    #[must_use]
    pub const fn clears_local_id(&self) -> bool {
        matches!(
            self,
            Self::NeedsRelinkIdMismatch { .. } | Self::NeedsRelinkSlugMismatch { .. }
        )
    }

    /// Returns `true` when the project must be (re)linked.
    #[must_use]
    pub const fn requires_link(&self) -> bool {
        !matches!(self, Self::AlreadyLinked { .. })
    }
}

impl Display for ReconciliationOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyLinked {
                full_name,
                remote_id,
            } => write!(
                formatter,
                "EAS project: linked to {} (ID: {}).",
                full_name.as_deref().unwrap_or("(unknown)"),
                remote_id.as_deref().unwrap_or("(unknown)")
            ),
            Self::NeedsInitialLink => write!(
                formatter,
                "EAS project: not linked (missing \"extra.eas.projectId\"); initializing..."
            ),
            Self::NeedsRelinkIdMismatch {
                local_id,
                remote_id,
            } => write!(
                formatter,
                "EAS project: app.json projectId ({local_id}) does not match EAS ({remote_id}); re-initializing..."
            ),
            Self::NeedsRelinkSlugMismatch {
                full_name,
                local_slug,
            } => write!(
                formatter,
                "EAS project: linked to {full_name} but app.json slug is {local_slug:?}; resetting projectId and re-linking..."
            ),
            Self::NeedsRelinkQueryFailed { reason } => write!(
                formatter,
                "EAS project: unable to read project info ({reason}); re-initializing..."
            ),
        }
    }
}
