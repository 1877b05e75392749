use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Unified error type for git-tracking operations
///
/// Every variant except `Config`, `Toml` and `Io` belongs to the unrecoverable
/// tier: the current operation stops and the diagnostic is handed to the
/// caller. Expected tool failures travel as
/// [`ProcessResult::FatalApplicationError`](crate::process::ProcessResult) instead.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Error starting command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process took too long: '{command}' did not exit within {}s", .timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("Interrupted while awaiting process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("Could not read process stream: {0}")]
    Stream(#[source] std::io::Error),

    #[error(
        "Unexpected error code {}\n\nStandard output:\n{stdout}\n\nStandard error:\n{stderr}",
        .code.map_or_else(|| "(terminated by signal)".to_string(), |c| c.to_string())
    )]
    UnexpectedExit {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Success expectation not met: {output}")]
    SuccessExpected { output: String },

    #[error("Need {required}, found {}", .found.as_deref().unwrap_or("no recognizable version"))]
    UnsupportedVersion {
        required: String,
        found: Option<String>,
    },

    #[error("Path is not valid UTF-8 and cannot be passed to the tool: {}", .0.display())]
    NonUnicodePath(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-tracking
pub type Result<T> = std::result::Result<T, TrackingError>;

impl TrackingError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TrackingError::Config(msg.into())
    }

    /// Exit code carried by the error, if the tool got far enough to report one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TrackingError::UnexpectedExit { code, .. } => *code,
            _ => None,
        }
    }
}
