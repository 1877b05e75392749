use std::fmt;

/// Name of a branch, passed to the tool verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BranchName(String);

impl BranchName {
    pub fn new(value: impl Into<String>) -> Self {
        BranchName(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a commit as printed by the tool
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(value: impl Into<String>) -> Self {
        CommitId(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference the tool resolves to a single commit
///
/// Syntax is not validated here; the tool is the authority on what it accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Point {
    Branch(BranchName),
    Commit(CommitId),
}

impl Point {
    /// The commit-ish argument handed to the tool
    pub fn value(&self) -> &str {
        match self {
            Point::Branch(branch) => branch.value(),
            Point::Commit(commit) => commit.value(),
        }
    }
}

impl From<BranchName> for Point {
    fn from(branch: BranchName) -> Self {
        Point::Branch(branch)
    }
}

impl From<CommitId> for Point {
    fn from(commit: CommitId) -> Self {
        Point::Commit(commit)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}
