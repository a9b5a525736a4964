//! Command-line interface definitions for the `shipwright` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{ArgAction, Parser, ValueEnum};

/// Top-level CLI for the `shipwright` binary.
#[derive(Debug, Parser)]
#[command(
    name = "shipwright",
    version,
    about = "Check an Expo project, repair its EAS link, and start an EAS build"
)]
pub(crate) struct Cli {
    /// Platform to build.
    #[arg(short = 'p', long, value_enum, default_value_t = PlatformArg::Android)]
    pub(crate) platform: PlatformArg,
    /// EAS build profile from eas.json (default: the configured profile,
    /// `preview` unless overridden).
    #[arg(long, value_name = "NAME")]
    pub(crate) profile: Option<String>,
    /// Force a reinstall of JavaScript dependencies before building.
    #[arg(long)]
    pub(crate) install: bool,
    /// Plain output: `CI=1`, no colour, and a non-interactive EAS build
    /// (default behaviour).
    #[arg(long, conflicts_with = "interactive")]
    pub(crate) plain: bool,
    /// Keep EAS prompts, spinners and colour enabled.
    #[arg(long, conflicts_with = "plain")]
    pub(crate) interactive: bool,
    /// Expo project directory (default: the current directory).
    #[arg(long, value_name = "DIR")]
    pub(crate) project_dir: Option<String>,
    /// Increase diagnostic logging on stderr (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count)]
    pub(crate) verbose: u8,
    /// Extra arguments passed through to `eas build` (prefix with --).
    #[arg(trailing_var_arg = true, value_name = "EAS_ARGS")]
    pub(crate) eas_args: Vec<String>,
}

/// Platforms accepted by `--platform`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum PlatformArg {
    /// Android build.
    #[default]
    Android,
    /// iOS build.
    Ios,
}
