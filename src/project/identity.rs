//! Identity and summary views over the `expo` object.

use std::fmt::{self, Display};

use serde_json::{Map, Value};

/// Locally declared project identity.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectIdentity {
    /// Human-readable project identifier (`expo.slug`).
    pub slug: String,
    /// Linked EAS project id (`expo.extra.eas.projectId`); `None` until the
    /// project has been linked.
    pub remote_project_id: Option<String>,
}

impl ProjectIdentity {
    /// Returns a copy with the remote project id cleared.
    #[must_use]
    pub fn unlinked(&self) -> Self {
        Self {
            slug: self.slug.clone(),
            remote_project_id: None,
        }
    }
}

/// Fields printed before any tooling runs. Every field is optional.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProjectSummary {
    /// `expo.name`.
    pub name: Option<String>,
    /// `expo.slug`.
    pub slug: Option<String>,
    /// `expo.android.package`.
    pub android_package: Option<String>,
    /// `expo.ios.bundleIdentifier`.
    pub ios_bundle_identifier: Option<String>,
    /// `expo.owner`.
    pub owner: Option<String>,
    /// `expo.extra.eas.projectId`.
    pub remote_project_id: Option<String>,
}

impl ProjectSummary {
    pub(super) fn from_expo(expo: &Map<String, Value>) -> Self {
        Self {
            name: string_at(expo, &["name"]),
            slug: string_at(expo, &["slug"]),
            android_package: string_at(expo, &["android", "package"]),
            ios_bundle_identifier: string_at(expo, &["ios", "bundleIdentifier"]),
            owner: string_at(expo, &["owner"]),
            remote_project_id: project_id(expo).map(str::to_owned),
        }
    }
}

impl Display for ProjectSummary {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("name", &self.name),
            ("slug", &self.slug),
            ("android.package", &self.android_package),
            ("ios.bundleIdentifier", &self.ios_bundle_identifier),
            ("owner", &self.owner),
            ("extra.eas.projectId", &self.remote_project_id),
        ];
        write!(formatter, "Project config:")?;
        for (label, value) in rows {
            match value {
                Some(text) => write!(formatter, "\n- {label}: {text:?}")?,
                None => write!(formatter, "\n- {label}: (unset)")?,
            }
        }
        Ok(())
    }
}

pub(super) fn project_id(expo: &Map<String, Value>) -> Option<&str> {
    expo.get("extra")
        .and_then(|extra| extra.get("eas"))
        .and_then(|eas| eas.get("projectId"))
        .and_then(Value::as_str)
}

fn string_at(object: &Map<String, Value>, path: &[&str]) -> Option<String> {
    let (first, rest) = path.split_first()?;
    let mut current = object.get(*first)?;
    for key in rest {
        current = current.get(*key)?;
    }
    current.as_str().map(str::to_owned)
}
