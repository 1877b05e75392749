use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use git_tracking::config::{self, Config};
use git_tracking::domain::{BranchName, CommitId, ObjectName, Point};
use git_tracking::gate::VersionGate;
use git_tracking::process::ProcessResult;
use git_tracking::service::{ContentTracking, GitService};

mod ui;

#[derive(Parser)]
#[command(
    name = "git-tracking",
    version,
    about = "Create git worktrees, branches, trees and commits through the git executable"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log every git invocation")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installed git version and whether it is supported
    Version,
    /// Check out a branch into a new working tree
    Worktree {
        path: PathBuf,
        branch: String,
    },
    /// Create a branch at another branch or commit
    Branch {
        name: String,
        point: String,
        #[arg(long, help = "Treat the point as a commit id instead of a branch name")]
        commit: bool,
    },
    /// Create a commit from a tree object
    CommitTree {
        object: String,
    },
    /// Create the empty tree object
    Mktree,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("git_tracking={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    if let Err(e) = run(args.command, &config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Commands, config: &Config) -> Result<()> {
    // The version gate runs inside from_config, so only operations pay for it.
    let service = || GitService::from_config(config);

    match command {
        Commands::Version => {
            let invoker = config.invoker()?;
            let required = config.minimum_version()?;
            let current = VersionGate::new(&invoker).current_version();
            ui::display_version_check(current.as_ref(), &required);
            if !current.is_some_and(|v| required.is_met_by(&v)) {
                std::process::exit(1);
            }
        }
        Commands::Worktree { path, branch } => {
            service()?
                .add_work_tree(&path, &BranchName::new(branch.clone()))
                .with_context(|| format!("Failed to add worktree at {}", path.display()))?;
            ui::display_success(&format!(
                "Checked out {} into {}",
                branch,
                path.display()
            ));
        }
        Commands::Branch {
            name,
            point,
            commit,
        } => {
            let point = if commit {
                Point::from(CommitId::new(point))
            } else {
                Point::from(BranchName::new(point))
            };
            match service()?.create_branch(&BranchName::new(name.clone()), &point)? {
                ProcessResult::Success(_) => {
                    ui::display_success(&format!("Created branch {} at {}", name, point));
                }
                ProcessResult::FatalApplicationError(message) => {
                    ui::display_warning(&message);
                    std::process::exit(128);
                }
            }
        }
        Commands::CommitTree { object } => {
            let commit = service()?.commit_tree(&ObjectName::new(object))?;
            ui::display_value(commit.value());
        }
        Commands::Mktree => {
            let tree = service()?.make_tree()?;
            ui::display_value(tree.value());
        }
    }

    Ok(())
}
