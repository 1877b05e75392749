//! Domain values exchanged with the tool - pure types independent of process execution

pub mod object;
pub mod point;
pub mod version;

pub use object::ObjectName;
pub use point::{BranchName, CommitId, Point};
pub use version::SemanticVersion;
