//! Tool invocation layer
//!
//! Runs the external tool as a subprocess and folds its exit code into a
//! small closed result space.
//!
//! # Overview
//!
//! The primary abstraction is the [Invoker] trait. The implementations are:
//!
//! - [invoker::ProcessInvoker]: spawns the real executable with a deadline
//! - [mock::MockInvoker]: replays canned exit codes and records arguments, for tests
//!
//! # Exit code contract
//!
//! | Exit code | Outcome |
//! |-----------|---------|
//! | `0`       | [ProcessResult::Success] carrying trimmed stdout |
//! | `128`     | [ProcessResult::FatalApplicationError] carrying trimmed stderr |
//! | other     | [TrackingError::UnexpectedExit] with both streams |
//!
//! ```rust
//! # use git_tracking::process::{Invoker, Stdin};
//! # fn example<I: Invoker>(invoker: &I) -> git_tracking::Result<()> {
//! let output = invoker.run(&["mktree"], Stdin::Null)?.expect_success()?;
//! println!("empty tree: {}", output);
//! # Ok(())
//! # }
//! ```

pub mod invoker;
pub mod mock;

pub use invoker::ProcessInvoker;
pub use mock::{Invocation, MockInvoker};

use crate::error::{Result, TrackingError};
use std::path::PathBuf;

/// Exit code the tool uses for known, expected failures
pub const FATAL_APPLICATION_EXIT: i32 = 128;

/// Classified outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ProcessResult {
    /// Exit code 0, trimmed standard output
    Success(String),
    /// Exit code 128, trimmed standard error
    FatalApplicationError(String),
}

impl ProcessResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessResult::Success(_))
    }

    /// Payload regardless of outcome
    pub fn output(&self) -> &str {
        match self {
            ProcessResult::Success(output) | ProcessResult::FatalApplicationError(output) => {
                output
            }
        }
    }

    /// Unwrap the success payload, escalating a fatal application error
    pub fn expect_success(self) -> Result<String> {
        match self {
            ProcessResult::Success(output) => Ok(output),
            ProcessResult::FatalApplicationError(output) => {
                Err(TrackingError::SuccessExpected { output })
            }
        }
    }
}

/// Where the child reads its standard input from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stdin {
    /// Whatever the current process has
    #[default]
    Inherit,
    /// An empty source; reads hit end-of-file immediately
    Null,
    /// Contents of a file
    File(PathBuf),
}

/// Common tool invocation trait
///
/// Implementors hold no per-call state, so one invoker may serve several
/// threads at once; each call owns its own child process.
pub trait Invoker: Send + Sync {
    /// Run the tool with `args` appended after the program name, in order
    ///
    /// # Returns
    /// * `Ok(ProcessResult)` - The tool exited with 0 or 128
    /// * `Err` - The process could not be started, timed out, failed while
    ///   being awaited or read, or exited with any other code
    fn run(&self, args: &[&str], stdin: Stdin) -> Result<ProcessResult>;
}

/// Map an exit code and the captured streams to a [ProcessResult]
///
/// Streams are expected to be trimmed already. `None` means the child was
/// terminated without an exit code and is escalated like any unknown code.
pub fn classify(code: Option<i32>, stdout: String, stderr: String) -> Result<ProcessResult> {
    match code {
        Some(0) => Ok(ProcessResult::Success(stdout)),
        Some(FATAL_APPLICATION_EXIT) => Ok(ProcessResult::FatalApplicationError(stderr)),
        code => Err(TrackingError::UnexpectedExit {
            code,
            stdout,
            stderr,
        }),
    }
}
