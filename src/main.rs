//! Binary entry point for the `shipwright` CLI.

use std::env;
use std::io::{self, Write};
use std::mem;
use std::process;

use camino::Utf8PathBuf;
use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use shipwright::{
    BuildOptions, BuildPipeline, CommandExecutor, PASS_THROUGH_SEPARATOR, PathLocator,
    PipelineError, Platform, Progress, Project, SettingsError, ShipwrightConfig,
};

mod cli;

use cli::{Cli, PlatformArg};

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("cannot determine the project directory: {0}")]
    ProjectDir(String),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

fn main() {
    let raw: Vec<String> = env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let cli = parse_args(&raw).unwrap_or_else(|err| err.exit());
    init_tracing(cli.verbose);
    let exit_code = match execute(cli) {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn execute(cli: Cli) -> Result<(), CliError> {
    let config = ShipwrightConfig::load_without_cli_args()?;
    config.validate()?;
    let root = project_root(cli.project_dir.as_deref())?;
    let options = build_options(cli);

    let pipeline = BuildPipeline::new(
        Project::new(root),
        config,
        CommandExecutor::with_process_runner(Progress::stdout()),
        PathLocator,
    );
    pipeline.run(&options)?;
    Ok(())
}

fn project_root(explicit: Option<&str>) -> Result<Utf8PathBuf, CliError> {
    if let Some(dir) = explicit {
        return Ok(Utf8PathBuf::from(dir));
    }
    let cwd = env::current_dir().map_err(|err| CliError::ProjectDir(err.to_string()))?;
    Utf8PathBuf::from_path_buf(cwd)
        .map_err(|path| CliError::ProjectDir(format!("{} is not valid UTF-8", path.display())))
}

fn parse_args(raw: &[String]) -> Result<Cli, clap::Error> {
    let mut cli = Cli::try_parse_from(raw)?;
    cli.eas_args = restore_separator(raw, mem::take(&mut cli.eas_args));
    Ok(cli)
}

/// Puts back the `--` clap consumes ahead of the pass-through tail, so the
/// build request drops exactly one separator.
fn restore_separator(raw: &[String], tail: Vec<String>) -> Vec<String> {
    let separated = raw
        .len()
        .checked_sub(tail.len().saturating_add(1))
        .and_then(|index| raw.get(index))
        .is_some_and(|token| token == PASS_THROUGH_SEPARATOR);
    if !separated {
        return tail;
    }
    std::iter::once(PASS_THROUGH_SEPARATOR.to_owned())
        .chain(tail)
        .collect()
}

fn build_options(cli: Cli) -> BuildOptions {
    let platform = match cli.platform {
        PlatformArg::Android => Platform::Android,
        PlatformArg::Ios => Platform::Ios,
    };
    BuildOptions {
        platform,
        profile: cli.profile,
        force_install: cli.install,
        interactive: cli.interactive && !cli.plain,
        extra_args: cli.eas_args,
    }
}

fn filter_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("shipwright={level}")
}

fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "error: {err}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
