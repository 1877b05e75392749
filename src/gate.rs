//! Startup check of the installed tool version

use crate::domain::SemanticVersion;
use crate::error::{Result, TrackingError};
use crate::process::{Invoker, ProcessResult, Stdin};
use tracing::debug;

/// Lowest git release the service is known to work with
pub fn minimum_version() -> SemanticVersion {
    SemanticVersion::git(2, 37, 0)
}

/// Asks the tool for its version and compares it against a floor
pub struct VersionGate<'a, I: Invoker + ?Sized> {
    invoker: &'a I,
}

impl<'a, I: Invoker + ?Sized> VersionGate<'a, I> {
    pub fn new(invoker: &'a I) -> Self {
        VersionGate { invoker }
    }

    /// Version reported by `<tool> version`, or `None` when it cannot be determined
    ///
    /// Every failure, including an unrecoverable one, degrades to `None` here;
    /// [VersionGate::assert_minimum] turns that into a startup error.
    pub fn current_version(&self) -> Option<SemanticVersion> {
        match self.invoker.run(&["version"], Stdin::Inherit) {
            Ok(ProcessResult::Success(output)) => {
                let version = SemanticVersion::parse(&output);
                match &version {
                    Some(v) => debug!(version = %v, "Parsed as semantic version"),
                    None => debug!(output = %output, "Version output not recognized"),
                }
                version
            }
            Ok(ProcessResult::FatalApplicationError(message)) => {
                debug!(error = %message, "Tool refused to report its version");
                None
            }
            Err(e) => {
                debug!(error = %e, "Could not run version check");
                None
            }
        }
    }

    /// Fail unless the current version satisfies `required`
    pub fn assert_minimum(&self, required: &SemanticVersion) -> Result<SemanticVersion> {
        match self.current_version() {
            Some(current) if required.is_met_by(&current) => Ok(current),
            found => Err(TrackingError::UnsupportedVersion {
                required: required.to_string(),
                found: found.map(|v| v.to_string()),
            }),
        }
    }
}
