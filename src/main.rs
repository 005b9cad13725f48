//! gitlet CLI - miniature version-control command line interface

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gitlet::ops::{self, MergeOutcome};
use gitlet::transport::{add_remote, fetch, pull, push, remove_remote};
use gitlet::{Config, Repo};

#[derive(Parser)]
#[command(name = "gitlet")]
#[command(about = "miniature version-control system")]
#[command(version)]
struct Cli {
    /// working tree (the repository lives in its .gitlet directory)
    #[arg(short = 'C', long, env = "GITLET_WORK_TREE", default_value = ".")]
    work_tree: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// create a new repository in the working tree
    Init {
        /// name of the first branch
        #[arg(long)]
        initial_branch: Option<String>,
    },

    /// stage a file for addition
    Add {
        file: String,
    },

    /// record the staged changes
    Commit {
        #[arg(default_value = "")]
        message: String,
    },

    /// unstage a file, staging its removal if it is tracked
    Rm {
        file: String,
    },

    /// history of the current branch
    Log,

    /// every commit ever made
    GlobalLog,

    /// restore a file, or switch branches
    ///
    /// `checkout -- <file>`, `checkout <commit> -- <file>` or `checkout <branch>`
    Checkout {
        /// commit id (with a file) or branch name
        target: Option<String>,

        /// file to restore
        #[arg(last = true)]
        file: Option<String>,
    },

    /// print ids of commits with the given message
    Find {
        message: String,
    },

    /// show branches, staged files and working tree changes
    Status,

    /// create a branch at the current commit
    Branch {
        name: String,
    },

    /// delete a branch pointer
    RmBranch {
        name: String,
    },

    /// check out an arbitrary commit and make it the current tip
    Reset {
        commit: String,
    },

    /// merge a branch into the current branch
    Merge {
        branch: String,
    },

    /// register a remote repository root
    AddRemote {
        name: String,
        path: String,
    },

    /// forget a remote
    RmRemote {
        name: String,
    },

    /// send the current branch to a remote branch
    Push {
        remote: String,
        branch: String,
    },

    /// copy a remote branch into <remote>/<branch>
    Fetch {
        remote: String,
        branch: String,
    },

    /// fetch, then merge
    Pull {
        remote: String,
        branch: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> gitlet::Result<()> {
    if let Commands::Init { initial_branch } = &cli.command {
        let mut config = Config::default();
        if let Some(name) = initial_branch {
            config = config.with_default_branch(name.as_str());
        }
        Repo::init_with_config(&cli.work_tree, config)?;
        return Ok(());
    }

    let repo = Repo::open(&cli.work_tree)?;

    match cli.command {
        Commands::Init { .. } => {}

        Commands::Add { file } => ops::add(&repo, &file)?,

        Commands::Commit { message } => {
            ops::commit(&repo, &message)?;
        }

        Commands::Rm { file } => ops::rm(&repo, &file)?,

        Commands::Log => {
            for entry in ops::log(&repo)? {
                print!("{}", entry);
            }
        }

        Commands::GlobalLog => {
            for entry in ops::global_log(&repo)? {
                print!("{}", entry);
            }
        }

        Commands::Checkout { target, file } => {
            checkout(&repo, target.as_deref(), file.as_deref())?
        }

        Commands::Find { message } => {
            for hash in ops::find(&repo, &message)? {
                println!("{}", hash);
            }
        }

        Commands::Status => print!("{}", ops::status(&repo)?),

        Commands::Branch { name } => {
            ops::create_branch(&repo, &name)?;
        }

        Commands::RmBranch { name } => ops::delete_branch(&repo, &name)?,

        Commands::Reset { commit } => {
            ops::reset(&repo, &commit)?;
        }

        Commands::Merge { branch } => report_merge(&ops::merge(&repo, &branch)?),

        Commands::AddRemote { name, path } => add_remote(&repo, &name, &path)?,

        Commands::RmRemote { name } => remove_remote(&repo, &name)?,

        Commands::Push { remote, branch } => {
            push(&repo, &remote, &branch)?;
        }

        Commands::Fetch { remote, branch } => {
            fetch(&repo, &remote, &branch)?;
        }

        Commands::Pull { remote, branch } => report_merge(&pull(&repo, &remote, &branch)?),
    }

    Ok(())
}

/// dispatch the three checkout forms
fn checkout(repo: &Repo, target: Option<&str>, file: Option<&str>) -> gitlet::Result<()> {
    match (target, file) {
        (target, Some(file)) => ops::checkout_file(repo, target, file),
        (Some(branch), None) => ops::checkout_branch(repo, branch),
        (None, None) => Err(gitlet::Error::IncorrectOperands),
    }
}

fn report_merge(outcome: &MergeOutcome) {
    match outcome {
        MergeOutcome::FastForwarded(_) => println!("Current branch fast-forwarded."),
        MergeOutcome::Merged { .. } if outcome.has_conflicts() => {
            println!("Encountered a merge conflict.")
        }
        MergeOutcome::Merged { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitlet::Error;
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_checkout_without_operands() {
        let (_dir, repo) = test_repo();

        let result = checkout(&repo, None, None);
        assert!(matches!(result, Err(Error::IncorrectOperands)));
        assert_eq!(Error::IncorrectOperands.to_string(), "Incorrect operands.");
    }

    #[test]
    fn test_checkout_forms() {
        let (dir, repo) = test_repo();

        fs::write(dir.path().join("a.txt"), "v1").unwrap();
        ops::add(&repo, "a.txt").unwrap();
        let first = ops::commit(&repo, "v1").unwrap();
        fs::write(dir.path().join("a.txt"), "v2").unwrap();
        ops::add(&repo, "a.txt").unwrap();
        ops::commit(&repo, "v2").unwrap();

        fs::write(dir.path().join("a.txt"), "scratch").unwrap();
        checkout(&repo, None, Some("a.txt")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "v2");

        checkout(&repo, Some(&first.to_hex()[..8]), Some("a.txt")).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("a.txt")).unwrap(), "v1");

        ops::create_branch(&repo, "dev").unwrap();
        checkout(&repo, Some("dev"), None).unwrap();
        assert_eq!(gitlet::read_head(&repo).unwrap(), "dev");
    }

    #[test]
    fn test_cli_parses_checkout_forms() {
        let cli = Cli::try_parse_from(["gitlet", "checkout", "--", "a.txt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Checkout { target: None, file: Some(ref f) } if f == "a.txt"
        ));

        let cli = Cli::try_parse_from(["gitlet", "checkout", "abc123", "--", "a.txt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Checkout { target: Some(ref t), file: Some(_) } if t == "abc123"
        ));

        let cli = Cli::try_parse_from(["gitlet", "checkout"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Checkout { target: None, file: None }
        ));
    }
}
