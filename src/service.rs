//! Content tracking operations backed by the git executable
//!
//! [GitService] is the only way to reach the operations, and it can only be
//! built after the version gate has passed.
//!
//! ```rust,no_run
//! # use git_tracking::service::{ContentTracking, GitService};
//! # use git_tracking::config::Config;
//! # fn example() -> git_tracking::Result<()> {
//! let service = GitService::from_config(&Config::default())?;
//! let tree = service.make_tree()?;
//! let commit = service.commit_tree(&tree)?;
//! println!("created {}", commit);
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::domain::{BranchName, CommitId, ObjectName, Point, SemanticVersion};
use crate::error::{Result, TrackingError};
use crate::gate::VersionGate;
use crate::process::{Invoker, ProcessInvoker, ProcessResult, Stdin};
use std::path::Path;
use tracing::{info, warn};

/// Message recorded on commits created by [ContentTracking::commit_tree]
pub const DEFAULT_COMMIT_MESSAGE: &str = "build: new documentation package";

/// The narrow slice of version control the rest of the system relies on
pub trait ContentTracking {
    /// Check out `branch` into a new working tree at `path`, replacing stale registrations
    ///
    /// A path that is not valid UTF-8 is rejected before the tool runs.
    fn add_work_tree(&self, path: &Path, branch: &BranchName) -> Result<()>;

    /// Create branch `name` at `point`
    ///
    /// # Returns
    /// * `Ok(ProcessResult::Success)` - The branch was created
    /// * `Ok(ProcessResult::FatalApplicationError)` - The tool refused, e.g. the branch exists
    /// * `Err` - Anything unrecoverable
    fn create_branch(&self, name: &BranchName, point: &Point) -> Result<ProcessResult>;

    /// Create a parentless commit of tree `name`
    fn commit_tree(&self, name: &ObjectName) -> Result<CommitId>;

    /// Create the empty tree object
    fn make_tree(&self) -> Result<ObjectName>;
}

/// [ContentTracking] implemented by running git subcommands
#[derive(Debug)]
pub struct GitService<I: Invoker = ProcessInvoker> {
    invoker: I,
    version: SemanticVersion,
    commit_message: String,
}

impl<I: Invoker> GitService<I> {
    /// Build the service after checking the tool against `required`
    ///
    /// # Returns
    /// * `Ok(GitService)` - The tool reports a compatible version
    /// * `Err(TrackingError::UnsupportedVersion)` - Version too old, too new, or unknown
    pub fn new(invoker: I, required: &SemanticVersion) -> Result<Self> {
        let version = VersionGate::new(&invoker).assert_minimum(required)?;
        info!(version = %version, required = %required, "Version check passed");

        Ok(GitService {
            invoker,
            version,
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
        })
    }

    /// Use `message` for every commit created by this service
    pub fn with_commit_message(mut self, message: impl Into<String>) -> Self {
        self.commit_message = message.into();
        self
    }

    /// Version reported by the tool when the service was built
    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    pub fn invoker(&self) -> &I {
        &self.invoker
    }
}

impl GitService<ProcessInvoker> {
    /// Build a service from configuration, running the version gate
    pub fn from_config(config: &Config) -> Result<Self> {
        let required = config.minimum_version()?;
        let service = GitService::new(config.invoker()?, &required)?;
        Ok(service.with_commit_message(config.commit.message.clone()))
    }
}

impl<I: Invoker> ContentTracking for GitService<I> {
    fn add_work_tree(&self, path: &Path, branch: &BranchName) -> Result<()> {
        let path = path
            .to_str()
            .ok_or_else(|| TrackingError::NonUnicodePath(path.to_path_buf()))?;
        self.invoker
            .run(
                &["worktree", "add", "--force", path, branch.value()],
                Stdin::Inherit,
            )?
            .expect_success()?;
        Ok(())
    }

    fn create_branch(&self, name: &BranchName, point: &Point) -> Result<ProcessResult> {
        let result = self
            .invoker
            .run(&["branch", name.value(), point.value()], Stdin::Inherit)?;

        if let ProcessResult::FatalApplicationError(message) = &result {
            warn!(branch = %name, point = %point, error = %message, "Branch not created");
        }
        Ok(result)
    }

    fn commit_tree(&self, name: &ObjectName) -> Result<CommitId> {
        let output = self
            .invoker
            .run(
                &["commit-tree", name.value(), "-m", &self.commit_message],
                Stdin::Inherit,
            )?
            .expect_success()?;
        Ok(CommitId::new(output))
    }

    fn make_tree(&self) -> Result<ObjectName> {
        let output = self
            .invoker
            .run(&["mktree"], Stdin::Null)?
            .expect_success()?;
        Ok(ObjectName::new(output))
    }
}
