// Shared helpers for integration tests
#![allow(dead_code)]

use git_tracking::process::ProcessInvoker;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

pub const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// A directory of shell scripts standing in for the tool.
///
/// Running `sh <subcommand> <args...>` from this directory executes the script
/// named after the subcommand. Scripts are read by `sh`, never executed
/// directly, so parallel tests cannot hit ETXTBSY on freshly written files.
pub struct FakeTool {
    pub dir: TempDir,
}

impl FakeTool {
    pub fn new(version: &str) -> Self {
        let tool = FakeTool {
            dir: TempDir::new().unwrap(),
        };
        tool.script("version", &format!("echo '{}'", version));
        tool
    }

    /// A fake tool that answers every subcommand the service uses
    pub fn complete(version: &str) -> Self {
        let tool = FakeTool::new(version);
        tool.script("mktree", &format!("cat\necho '{}'", EMPTY_TREE));
        tool.script(
            "commit-tree",
            r#"[ "$2" = "-m" ] || exit 2
printf '%s\n' "$3" > commit-message
echo "commit-of-$1""#,
        );
        tool.script(
            "branch",
            r#"if grep -qx "$1" branches 2>/dev/null; then
  echo "fatal: a branch named '$1' already exists" >&2
  exit 128
fi
echo "$1" >> branches"#,
        );
        tool.script(
            "worktree",
            r#"[ "$1" = "add" ] && [ "$2" = "--force" ] || exit 2
mkdir -p "$3"
echo "$4" > "$3/BRANCH""#,
        );
        tool
    }

    pub fn script(&self, name: &str, body: &str) {
        fs::write(self.dir.path().join(name), format!("{}\n", body)).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn invoker(&self) -> ProcessInvoker {
        ProcessInvoker::new("sh", Duration::from_secs(10)).with_working_dir(self.path())
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path().join(name)).unwrap()
    }
}
