//! Build request assembly and dispatch.

use std::fmt;

use tracing::info;

use crate::runner::CommandFailure;

/// Flag that stops the EAS CLI from prompting.
pub const NON_INTERACTIVE_FLAG: &str = "--non-interactive";
/// Token marking the start of arguments passed through verbatim.
pub const PASS_THROUGH_SEPARATOR: &str = "--";

/// Target platform of a build.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Platform {
    /// Android build.
    #[default]
    Android,
    /// iOS build.
    Ios,
}

impl Platform {
    /// Lowercase name passed to `eas build -p`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A build to dispatch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildRequest {
    /// Target platform.
    pub platform: Platform,
    /// Validated build profile name.
    pub profile: String,
    /// Arguments passed through to `eas build`.
    pub extra_args: Vec<String>,
    /// Leaves prompts enabled when `true`.
    pub interactive: bool,
}

impl BuildRequest {
    /// Assembles the `eas build` argument list.
    ///
    /// One leading `--` in the extra arguments is dropped. The
    /// non-interactive flag is added unless the request is interactive or
    /// the extra arguments already contain it.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        let extras = match self.extra_args.split_first() {
            Some((first, rest)) if first == PASS_THROUGH_SEPARATOR => rest,
            _ => self.extra_args.as_slice(),
        };

        let mut args = vec![
            String::from("build"),
            String::from("-p"),
            self.platform.as_str().to_owned(),
            String::from("--profile"),
            self.profile.clone(),
        ];
        if !self.interactive && !extras.iter().any(|arg| arg == NON_INTERACTIVE_FLAG) {
            args.push(NON_INTERACTIVE_FLAG.to_owned());
        }
        args.extend(extras.iter().cloned());
        args
    }
}

/// Remote service that starts builds.
pub trait BuildService {
    /// Starts a build with the given `eas` arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the build command fails.
    fn start_build(&self, arguments: &[String]) -> Result<(), CommandFailure>;
}

/// Dispatches build requests to a [`BuildService`].
#[derive(Debug)]
pub struct BuildDispatcher<S: BuildService> {
    service: S,
}

impl<S: BuildService> BuildDispatcher<S> {
    /// Creates a dispatcher around `service`.
    #[must_use]
    pub const fn new(service: S) -> Self {
        Self { service }
    }

    /// Starts the build described by `request`. Single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CommandFailure`] when the build command fails.
    pub fn dispatch(&self, request: &BuildRequest) -> Result<(), CommandFailure> {
        let arguments = request.arguments();
        info!(
            platform = %request.platform,
            profile = %request.profile,
            "dispatching build"
        );
        self.service.start_build(&arguments)
    }
}
