//! Local Expo project files: `app.json`, `eas.json` and `package.json`.
//!
//! [`Project`] reads the declared identity and build profiles, and rewrites
//! `app.json` when the linked EAS project id changes. Edits keep every
//! unrelated field and the original key order, use two-space indentation,
//! and end with a newline.

use std::collections::BTreeSet;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde_json::{Map, Value};
use tracing::debug;

mod error;
mod identity;

pub use error::ConfigError;
pub use identity::{ProjectIdentity, ProjectSummary};

/// Expo app declaration file.
pub const APP_JSON: &str = "app.json";
/// EAS build profile declaration file.
pub const EAS_JSON: &str = "eas.json";
/// npm package manifest.
pub const PACKAGE_JSON: &str = "package.json";

const EXPO_KEY: &str = "expo";
const SLUG_KEY: &str = "slug";
const EXTRA_KEY: &str = "extra";
const EAS_KEY: &str = "eas";
const PROJECT_ID_KEY: &str = "projectId";
const BUILD_KEY: &str = "build";

/// Abstraction over identity persistence for dependency injection.
pub trait IdentityStore {
    /// Reads the declared identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the declaration is missing, malformed, or
    /// incomplete.
    fn load_identity(&self) -> Result<ProjectIdentity, ConfigError>;

    /// Writes the identity's remote project id back to storage.
    ///
    /// Returns `true` when storage changed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading or writing the declaration fails.
    fn persist(&self, identity: &ProjectIdentity) -> Result<bool, ConfigError>;
}

/// An Expo project rooted at a directory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    root: Utf8PathBuf,
}

impl Project {
    /// Creates a handle for the project at `root`. Nothing is read yet.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Checks that `package.json`, `app.json` and `eas.json` exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] for the first absent file.
    pub fn ensure_layout(&self) -> Result<(), ConfigError> {
        for file_name in [PACKAGE_JSON, APP_JSON, EAS_JSON] {
            if !self.has_file(file_name) {
                return Err(ConfigError::MissingFile {
                    path: self.root.join(file_name),
                });
            }
        }
        Ok(())
    }

    /// Returns `true` when `name` is a regular file inside the project.
    #[must_use]
    pub fn has_file(&self, name: &str) -> bool {
        self.open_root().is_ok_and(|dir| dir.is_file(name))
    }

    /// Returns `true` when `name` is a directory inside the project.
    #[must_use]
    pub fn has_dir(&self, name: &str) -> bool {
        self.open_root().is_ok_and(|dir| dir.is_dir(name))
    }

    /// Reads the fields shown in the pre-build summary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `app.json` is missing, malformed, or has
    /// no `expo` object.
    pub fn summary(&self) -> Result<ProjectSummary, ConfigError> {
        let path = self.root.join(APP_JSON);
        let document = self.read_json(APP_JSON)?;
        let expo = expo_object(&path, &document)?;
        Ok(ProjectSummary::from_expo(expo))
    }

    /// Reads the declared slug and linked EAS project id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `expo` or a non-empty
    /// string `expo.slug` is missing, besides file and parse errors.
    pub fn load_identity(&self) -> Result<ProjectIdentity, ConfigError> {
        let path = self.root.join(APP_JSON);
        let document = self.read_json(APP_JSON)?;
        let expo = expo_object(&path, &document)?;

        let slug = expo
            .get(SLUG_KEY)
            .and_then(Value::as_str)
            .filter(|slug| !slug.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField {
                path: path.clone(),
                field: format!("{EXPO_KEY}.{SLUG_KEY}"),
            })?;

        Ok(ProjectIdentity {
            slug: slug.to_owned(),
            remote_project_id: identity::project_id(expo).map(str::to_owned),
        })
    }

    /// Lists the build profile names declared in `eas.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `build` is not an object,
    /// besides file and parse errors.
    pub fn build_profiles(&self) -> Result<BTreeSet<String>, ConfigError> {
        let path = self.root.join(EAS_JSON);
        let document = self.read_json(EAS_JSON)?;
        let build = document
            .get(BUILD_KEY)
            .and_then(Value::as_object)
            .ok_or_else(|| ConfigError::MissingField {
                path,
                field: BUILD_KEY.to_owned(),
            })?;
        Ok(build.keys().cloned().collect())
    }

    /// Ensures `name` is a build profile declared in `eas.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownProfile`] when it is not.
    pub fn validate_profile(&self, name: &str) -> Result<(), ConfigError> {
        let profiles = self.build_profiles()?;
        if profiles.contains(name) {
            return Ok(());
        }
        Err(ConfigError::UnknownProfile {
            profile: name.to_owned(),
            path: self.root.join(EAS_JSON),
            available: profiles.into_iter().collect::<Vec<_>>().join(", "),
        })
    }

    /// Sets or clears `expo.extra.eas.projectId` to match `identity`.
    ///
    /// Clearing prunes `eas` and then `extra` when they become empty. The
    /// file is only rewritten when its content changes. The slug is never
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// written, or when `extra`/`eas` exist but are not objects.
    pub fn persist(&self, identity: &ProjectIdentity) -> Result<bool, ConfigError> {
        let path = self.root.join(APP_JSON);
        let mut document = self.read_json(APP_JSON)?;
        let expo = document
            .get_mut(EXPO_KEY)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| missing_expo(&path))?;

        let changed = match identity.remote_project_id.as_deref() {
            Some(project_id) => set_project_id(&path, expo, project_id)?,
            None => remove_project_id(expo),
        };
        if !changed {
            return Ok(false);
        }

        self.write_json(APP_JSON, &document)?;
        debug!(path = %path, "rewrote project declaration");
        Ok(true)
    }

    fn open_root(&self) -> Result<Dir, ConfigError> {
        Dir::open_ambient_dir(&self.root, ambient_authority()).map_err(|err| ConfigError::Io {
            path: self.root.clone(),
            message: err.to_string(),
        })
    }

    fn read_json(&self, file_name: &str) -> Result<Value, ConfigError> {
        let path = self.root.join(file_name);
        let dir = self.open_root()?;
        let contents = dir.read_to_string(file_name).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ConfigError::MissingFile { path: path.clone() }
            } else {
                ConfigError::Io {
                    path: path.clone(),
                    message: err.to_string(),
                }
            }
        })?;

        serde_json::from_str(&contents).map_err(|err| ConfigError::MalformedJson {
            path,
            message: err.to_string(),
        })
    }

    fn write_json(&self, file_name: &str, document: &Value) -> Result<(), ConfigError> {
        let path = self.root.join(file_name);
        let mut rendered =
            serde_json::to_string_pretty(document).map_err(|err| ConfigError::Serialize {
                path: path.clone(),
                message: err.to_string(),
            })?;
        rendered.push('\n');

        let dir = self.open_root()?;
        dir.write(file_name, rendered)
            .map_err(|err| ConfigError::Io {
                path,
                message: err.to_string(),
            })
    }
}

impl IdentityStore for Project {
    fn load_identity(&self) -> Result<ProjectIdentity, ConfigError> {
        Self::load_identity(self)
    }

    fn persist(&self, identity: &ProjectIdentity) -> Result<bool, ConfigError> {
        Self::persist(self, identity)
    }
}

fn missing_expo(path: &Utf8Path) -> ConfigError {
    ConfigError::MissingField {
        path: path.to_path_buf(),
        field: EXPO_KEY.to_owned(),
    }
}

fn expo_object<'a>(
    path: &Utf8Path,
    document: &'a Value,
) -> Result<&'a Map<String, Value>, ConfigError> {
    document
        .get(EXPO_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| missing_expo(path))
}

fn child_object<'a>(
    path: &Utf8Path,
    parent: &'a mut Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<&'a mut Map<String, Value>, ConfigError> {
    parent
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| ConfigError::InvalidStructure {
            path: path.to_path_buf(),
            message: format!("{field} must be an object"),
        })
}

fn set_project_id(
    path: &Utf8Path,
    expo: &mut Map<String, Value>,
    project_id: &str,
) -> Result<bool, ConfigError> {
    if identity::project_id(expo) == Some(project_id) {
        return Ok(false);
    }

    let extra = child_object(path, expo, EXTRA_KEY, "expo.extra")?;
    let eas = child_object(path, extra, EAS_KEY, "expo.extra.eas")?;
    eas.insert(
        PROJECT_ID_KEY.to_owned(),
        Value::String(project_id.to_owned()),
    );
    Ok(true)
}

fn remove_project_id(expo: &mut Map<String, Value>) -> bool {
    let Some(extra) = expo.get_mut(EXTRA_KEY).and_then(Value::as_object_mut) else {
        return false;
    };
    let Some(eas) = extra.get_mut(EAS_KEY).and_then(Value::as_object_mut) else {
        return false;
    };
    if eas.shift_remove(PROJECT_ID_KEY).is_none() {
        return false;
    }

    if eas.is_empty() {
        extra.shift_remove(EAS_KEY);
    }
    if extra.is_empty() {
        expo.shift_remove(EXTRA_KEY);
    }
    true
}

#[cfg(test)]
mod tests;
