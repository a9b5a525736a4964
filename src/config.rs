//! Tool configuration loading via `ortho-config`.
//!
//! Values merge defaults, `shipwright.toml` discovered in the usual
//! locations (or named by `SHIPWRIGHT_CONFIG_PATH`), and `SHIPWRIGHT_*`
//! environment variables.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default name of the EAS CLI executable.
pub const DEFAULT_EAS_BIN: &str = "eas";
/// Default name of the `npx` executable used as the EAS fallback.
pub const DEFAULT_NPX_BIN: &str = "npx";
/// Package spec fetched by `npx` when `eas` is not installed.
pub const DEFAULT_EAS_CLI_PACKAGE: &str = "eas-cli@latest";
/// Default name of the Node.js executable.
pub const DEFAULT_NODE_BIN: &str = "node";
/// Default name of the npm executable.
pub const DEFAULT_NPM_BIN: &str = "npm";
/// Build profile used when `--profile` is not given.
pub const DEFAULT_PROFILE: &str = "preview";

/// Settings for the build pipeline.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "SHIPWRIGHT",
    discovery(
        app_name = "shipwright",
        env_var = "SHIPWRIGHT_CONFIG_PATH",
        config_file_name = "shipwright.toml",
        dotfile_name = ".shipwright.toml",
        project_file_name = "shipwright.toml"
    )
)]
pub struct ShipwrightConfig {
    /// EAS CLI executable, looked up on `PATH`.
    #[ortho_config(default = DEFAULT_EAS_BIN.to_owned())]
    pub eas_bin: String,
    /// `npx` executable used when the EAS CLI is not installed.
    #[ortho_config(default = DEFAULT_NPX_BIN.to_owned())]
    pub npx_bin: String,
    /// Package spec passed to `npx --yes`.
    #[ortho_config(default = DEFAULT_EAS_CLI_PACKAGE.to_owned())]
    pub eas_cli_package: String,
    /// Node.js executable required before installing dependencies.
    #[ortho_config(default = DEFAULT_NODE_BIN.to_owned())]
    pub node_bin: String,
    /// npm executable used to install dependencies.
    #[ortho_config(default = DEFAULT_NPM_BIN.to_owned())]
    pub npm_bin: String,
    /// Build profile used when none is given on the command line.
    #[ortho_config(default = DEFAULT_PROFILE.to_owned())]
    pub default_profile: String,
    /// Request `--json` output from `eas project:info` instead of scraping
    /// its human-readable table.
    #[ortho_config(default = false)]
    pub project_info_json: bool,
}

/// Errors raised while loading or validating settings.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SettingsError {
    /// Raised when merging configuration layers fails.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
    /// Raised when a required value is blank.
    #[error(
        "missing {field}: set SHIPWRIGHT_{env_suffix} or add {field} to shipwright.toml",
        env_suffix = field.to_uppercase()
    )]
    InvalidValue {
        /// Configuration field that failed validation.
        field: String,
    },
}

impl ShipwrightConfig {
    /// Built-in values, as used when no file or environment overrides exist.
    #[must_use]
    pub fn builtin_defaults() -> Self {
        Self {
            eas_bin: DEFAULT_EAS_BIN.to_owned(),
            npx_bin: DEFAULT_NPX_BIN.to_owned(),
            eas_cli_package: DEFAULT_EAS_CLI_PACKAGE.to_owned(),
            node_bin: DEFAULT_NODE_BIN.to_owned(),
            npm_bin: DEFAULT_NPM_BIN.to_owned(),
            default_profile: DEFAULT_PROFILE.to_owned(),
            project_info_json: false,
        }
    }

    /// Loads configuration from files and environment without parsing CLI
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] when merging sources fails.
    pub fn load_without_cli_args() -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from("shipwright")])
            .map_err(|err| SettingsError::Parse(err.to_string()))
    }

    /// Ensures every executable name and the default profile are non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] naming the first blank field.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let fields = [
            (&self.eas_bin, "eas_bin"),
            (&self.npx_bin, "npx_bin"),
            (&self.eas_cli_package, "eas_cli_package"),
            (&self.node_bin, "node_bin"),
            (&self.npm_bin, "npm_bin"),
            (&self.default_profile, "default_profile"),
        ];
        for (value, field) in fields {
            if value.trim().is_empty() {
                return Err(SettingsError::InvalidValue {
                    field: field.to_owned(),
                });
            }
        }
        Ok(())
    }
}
