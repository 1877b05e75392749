// tests/service_test.rs
#![cfg(unix)]

mod common;

use common::{FakeTool, EMPTY_TREE};
use git_tracking::config::Config;
use git_tracking::domain::{BranchName, CommitId, ObjectName, Point, SemanticVersion};
use git_tracking::gate::{minimum_version, VersionGate};
use git_tracking::process::ProcessResult;
use git_tracking::service::{ContentTracking, GitService};
use git_tracking::TrackingError;

#[test]
fn test_version_gate_reads_tool_output() {
    let tool = FakeTool::new("git version 2.41.0 (Apple Git-140)");
    let invoker = tool.invoker();

    assert_eq!(
        VersionGate::new(&invoker).current_version(),
        Some(SemanticVersion::git(2, 41, 0))
    );
}

#[test]
fn test_service_refuses_old_tool() {
    let tool = FakeTool::complete("git version 2.30.2");

    let err = GitService::new(tool.invoker(), &minimum_version()).unwrap_err();
    assert_eq!(err.to_string(), "Need git 2.37.0, found git 2.30.2");
}

#[test]
fn test_service_refuses_tool_without_version_command() {
    let tool = FakeTool::complete("git version 2.41.0");
    std::fs::remove_file(tool.path().join("version")).unwrap();

    let err = GitService::new(tool.invoker(), &minimum_version()).unwrap_err();
    assert!(matches!(
        err,
        TrackingError::UnsupportedVersion { found: None, .. }
    ));
}

#[test]
fn test_make_tree_then_commit_tree() {
    let tool = FakeTool::complete("git version 2.41.0");
    let service = GitService::new(tool.invoker(), &minimum_version()).unwrap();

    let tree = service.make_tree().unwrap();
    assert_eq!(tree, ObjectName::new(EMPTY_TREE));

    let commit = service.commit_tree(&ObjectName::new("deadbeef")).unwrap();
    assert_eq!(commit, CommitId::new("commit-of-deadbeef"));
    assert_eq!(tool.read("commit-message"), "build: new documentation package\n");
}

#[test]
fn test_commit_tree_with_configured_message() {
    let tool = FakeTool::complete("git version 2.41.0");
    let service = GitService::new(tool.invoker(), &minimum_version())
        .unwrap()
        .with_commit_message("docs: publish site");

    service.commit_tree(&ObjectName::new(EMPTY_TREE)).unwrap();
    assert_eq!(tool.read("commit-message"), "docs: publish site\n");
}

#[test]
fn test_create_branch_reports_existing_branch() {
    let tool = FakeTool::complete("git version 2.41.0");
    let service = GitService::new(tool.invoker(), &minimum_version()).unwrap();
    let name = BranchName::new("gh-pages");
    let point = Point::from(CommitId::new("commit-of-deadbeef"));

    let first = service.create_branch(&name, &point).unwrap();
    assert!(first.is_success());

    let second = service.create_branch(&name, &point).unwrap();
    assert_eq!(
        second,
        ProcessResult::FatalApplicationError(
            "fatal: a branch named 'gh-pages' already exists".to_string()
        )
    );
}

#[test]
fn test_add_work_tree_passes_path_and_branch() {
    let tool = FakeTool::complete("git version 2.41.0");
    let service = GitService::new(tool.invoker(), &minimum_version()).unwrap();
    let target = tool.path().join("site checkout");

    service
        .add_work_tree(&target, &BranchName::new("gh-pages"))
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(target.join("BRANCH")).unwrap(),
        "gh-pages\n"
    );
}

#[test]
fn test_unexpected_exit_from_operation_escalates() {
    let tool = FakeTool::complete("git version 2.41.0");
    tool.script("mktree", "echo 'usage: git mktree' >&2\nexit 129");
    let service = GitService::new(tool.invoker(), &minimum_version()).unwrap();

    let err = service.make_tree().unwrap_err();
    assert_eq!(err.exit_code(), Some(129));
    assert!(err.to_string().contains("usage: git mktree"));
}

#[test]
fn test_from_config() {
    let tool = FakeTool::complete("git version 2.41.0");
    let mut config = Config::default();
    config.tool.program = "sh".to_string();
    config.tool.working_dir = Some(tool.path().to_path_buf());
    config.commit.message = "docs: from config".to_string();

    let service = GitService::from_config(&config).unwrap();
    assert_eq!(service.version(), &SemanticVersion::git(2, 41, 0));
    assert_eq!(service.commit_message(), "docs: from config");
    assert_eq!(service.make_tree().unwrap().value(), EMPTY_TREE);
}

#[test]
fn test_from_config_with_raised_minimum() {
    let tool = FakeTool::complete("git version 2.41.0");
    let mut config = Config::default();
    config.tool.program = "sh".to_string();
    config.tool.working_dir = Some(tool.path().to_path_buf());
    config.requirement.minimum = "2.42.0".to_string();

    assert!(GitService::from_config(&config).is_err());
}
