use crate::domain::SemanticVersion;
use crate::error::{Result, TrackingError};
use crate::process::invoker::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use crate::process::ProcessInvoker;
use crate::service::DEFAULT_COMMIT_MESSAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "gittracking.toml";

/// File name looked up in the user configuration directory
pub const USER_CONFIG_FILE: &str = ".gittracking.toml";

/// Represents the complete configuration for git-tracking.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tool: ToolConfig,

    #[serde(default)]
    pub requirement: RequirementConfig,

    #[serde(default)]
    pub commit: CommitConfig,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// How the tool executable is launched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory the tool runs in; the current directory when absent
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        ToolConfig {
            program: default_program(),
            timeout_secs: default_timeout_secs(),
            working_dir: None,
        }
    }
}

fn default_requirement_name() -> String {
    "git".to_string()
}

fn default_minimum() -> String {
    "2.37.0".to_string()
}

/// Lowest tool version accepted at startup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RequirementConfig {
    #[serde(default = "default_requirement_name")]
    pub name: String,

    #[serde(default = "default_minimum")]
    pub minimum: String,
}

impl Default for RequirementConfig {
    fn default() -> Self {
        RequirementConfig {
            name: default_requirement_name(),
            minimum: default_minimum(),
        }
    }
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

/// Settings for commits created by the service.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    #[serde(default = "default_commit_message")]
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            message: default_commit_message(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the invoker described by the `[tool]` section
    pub fn invoker(&self) -> Result<ProcessInvoker> {
        if self.tool.program.trim().is_empty() {
            return Err(TrackingError::config("tool.program must not be empty"));
        }
        if self.tool.timeout_secs == 0 {
            return Err(TrackingError::config(
                "tool.timeout_secs must be greater than zero",
            ));
        }

        let invoker = ProcessInvoker::new(
            self.tool.program.clone(),
            Duration::from_secs(self.tool.timeout_secs),
        );
        Ok(match &self.tool.working_dir {
            Some(dir) => invoker.with_working_dir(dir),
            None => invoker,
        })
    }

    /// Build the version floor described by the `[requirement]` section
    pub fn minimum_version(&self) -> Result<SemanticVersion> {
        SemanticVersion::from_semver(
            self.requirement.name.clone(),
            &self.requirement.minimum,
        )
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gittracking.toml` in current directory
/// 3. `.gittracking.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tool.program, "git");
        assert_eq!(config.tool.timeout_secs, 10);
        assert_eq!(config.tool.working_dir, None);
        assert_eq!(config.commit.message, "build: new documentation package");
        assert_eq!(
            config.minimum_version().unwrap(),
            SemanticVersion::git(2, 37, 0)
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
[tool]
timeout_secs = 30
"#,
        )
        .unwrap();
        assert_eq!(config.tool.timeout_secs, 30);
        assert_eq!(config.tool.program, "git");
        assert_eq!(config.requirement, RequirementConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = Config::from_toml("[tool\nprogram = 1").unwrap_err();
        assert!(matches!(err, TrackingError::Toml(_)));
    }

    #[test]
    fn test_invoker_from_config() {
        let mut config = Config::default();
        config.tool.program = "/usr/local/bin/git".to_string();
        config.tool.timeout_secs = 3;
        config.tool.working_dir = Some(PathBuf::from("/srv/repo"));

        let invoker = config.invoker().unwrap();
        assert_eq!(invoker.program(), "/usr/local/bin/git");
        assert_eq!(invoker.timeout(), Duration::from_secs(3));
        assert_eq!(invoker.working_dir(), Some(Path::new("/srv/repo")));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.tool.timeout_secs = 0;
        assert!(matches!(config.invoker(), Err(TrackingError::Config(_))));
    }

    #[test]
    fn test_empty_program_rejected() {
        let mut config = Config::default();
        config.tool.program = "  ".to_string();
        assert!(config.invoker().is_err());
    }

    #[test]
    fn test_invalid_minimum_rejected() {
        let mut config = Config::default();
        config.requirement.minimum = "two".to_string();
        assert!(matches!(
            config.minimum_version(),
            Err(TrackingError::Config(_))
        ));
    }
}
