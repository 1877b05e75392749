use crate::error::{Result, TrackingError};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Version of a named tool, as reported by `<tool> version`
///
/// The name is never empty and never contains a space, so every value
/// renders to a line that [`SemanticVersion::parse`] accepts back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    name: String,
    major: u32,
    minor: u32,
    patch: u32,
}

fn check_name(name: String) -> Result<String> {
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(TrackingError::config(format!(
            "Tool name '{}' must be a single non-empty word",
            name
        )));
    }
    Ok(name)
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\S+) version ([0-9]+)\.([0-9]+)\.([0-9]+)(?: \(.*\))?$")
            .expect("version pattern is a valid regex")
    })
}

impl SemanticVersion {
    /// Create a new version, rejecting names the tool could never print
    pub fn new(name: impl Into<String>, major: u32, minor: u32, patch: u32) -> Result<Self> {
        Ok(SemanticVersion {
            name: check_name(name.into())?,
            major,
            minor,
            patch,
        })
    }

    /// A version of `git`
    pub fn git(major: u32, minor: u32, patch: u32) -> Self {
        SemanticVersion {
            name: "git".to_string(),
            major,
            minor,
            patch,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> u32 {
        self.patch
    }

    /// Parse a version line such as `git version 2.41.0 (Apple Git-140)`
    ///
    /// The whole text must match; a trailing parenthetical is ignored.
    /// Anything else, including components that overflow `u32`, yields `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let captures = version_pattern().captures(text)?;
        let component = |i: usize| captures.get(i)?.as_str().parse::<u32>().ok();

        Some(SemanticVersion {
            name: captures.get(1)?.as_str().to_string(),
            major: component(2)?,
            minor: component(3)?,
            patch: component(4)?,
        })
    }

    /// Build a requirement from a `major.minor.patch` string validated by `semver`
    pub fn from_semver(name: impl Into<String>, version: &str) -> Result<Self> {
        let parsed = semver::Version::parse(version).map_err(|e| {
            TrackingError::config(format!("Invalid minimum version '{}': {}", version, e))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(TrackingError::config(format!(
                "Minimum version '{}' must be plain major.minor.patch",
                version
            )));
        }

        let component = |value: u64| {
            u32::try_from(value).map_err(|_| {
                TrackingError::config(format!("Minimum version '{}' is out of range", version))
            })
        };

        Ok(SemanticVersion {
            name: check_name(name.into())?,
            major: component(parsed.major)?,
            minor: component(parsed.minor)?,
            patch: component(parsed.patch)?,
        })
    }

    /// Render the line the tool prints, which [`SemanticVersion::parse`] accepts back
    pub fn version_line(&self) -> String {
        format!(
            "{} version {}.{}.{}",
            self.name, self.major, self.minor, self.patch
        )
    }

    /// Whether `candidate` satisfies this version used as a floor
    ///
    /// Names and major versions must be equal; a newer major is rejected.
    pub fn is_met_by(&self, candidate: &SemanticVersion) -> bool {
        candidate.name == self.name
            && candidate.major == self.major
            && candidate.minor >= self.minor
            && (candidate.minor > self.minor || candidate.patch >= self.patch)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}.{}",
            self.name, self.major, self.minor, self.patch
        )
    }
}
