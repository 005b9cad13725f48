//! push operation - send commits to a remote branch

use tracing::info;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::refs::{current_branch, read_branch, write_branch};
use crate::repo::Repo;
use crate::transport::local::{copy_commit, TransferStats};
use crate::transport::remote::open_remote;

/// push result
#[derive(Debug, Clone)]
pub struct PushResult {
    /// remote branch tip after the push
    pub tip: Hash,
    /// commits appended to the remote branch
    pub commits: usize,
    pub stats: TransferStats,
}

/// push the current branch onto `branch` of remote `remote_name`
///
/// a missing remote branch receives the whole local history. an existing
/// one must have its tip somewhere in the local history, otherwise the
/// push is refused until the remote changes are pulled.
pub fn push(repo: &Repo, remote_name: &str, branch: &str) -> Result<PushResult> {
    let remote = open_remote(repo, remote_name)?;
    let local = current_branch(repo)?;
    let mut stats = TransferStats::default();

    let (updated, commits) = match read_branch(&remote, branch) {
        Ok(mut remote_branch) => {
            let ahead = local
                .commits_since(&remote_branch.tip())
                .ok_or(Error::NeedsPull)?;

            // parent-to-child order
            for hash in ahead.iter().rev() {
                copy_commit(repo, &remote, hash, &mut stats)?;
                remote_branch.push(*hash);
            }
            (remote_branch, ahead.len())
        }
        Err(Error::BranchNotFound(_)) => {
            for hash in local.commits().iter().rev() {
                copy_commit(repo, &remote, hash, &mut stats)?;
            }
            (local.fork(branch), local.commits().len())
        }
        Err(e) => return Err(e),
    };

    write_branch(&remote, &updated)?;

    info!(
        remote = remote_name,
        branch,
        tip = %updated.tip(),
        commits,
        copied = stats.copied,
        hardlinked = stats.hardlinked,
        "pushed"
    );

    Ok(PushResult {
        tip: updated.tip(),
        commits,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::commit_exists;
    use crate::ops::{add, commit, create_branch};
    use crate::refs::branch_tip;
    use crate::transport::add_remote;
    use std::fs;
    use tempfile::tempdir;

    fn repo_pair() -> (tempfile::TempDir, Repo, Repo) {
        let dir = tempdir().unwrap();
        let local = Repo::init(&dir.path().join("local")).unwrap();
        let remote = Repo::init(&dir.path().join("remote")).unwrap();
        add_remote(&local, "origin", "../remote/.gitlet").unwrap();
        (dir, local, remote)
    }

    fn commit_file(repo: &Repo, path: &str, content: &str, message: &str) -> Hash {
        fs::write(repo.working_path(path), content).unwrap();
        add(repo, path).unwrap();
        commit(repo, message).unwrap()
    }

    #[test]
    fn test_push_fast_forward() {
        let (_dir, local, remote) = repo_pair();

        let c1 = commit_file(&local, "a.txt", "a", "one");
        let c2 = commit_file(&local, "b.txt", "b", "two");

        let result = push(&local, "origin", "master").unwrap();

        assert_eq!(result.tip, c2);
        assert_eq!(result.commits, 2);
        assert!(commit_exists(&remote, &c1));
        assert!(commit_exists(&remote, &c2));

        let remote_master = read_branch(&remote, "master").unwrap();
        assert_eq!(remote_master.commits()[..3], [c2, c1, crate::types::Commit::root().id]);
    }

    #[test]
    fn test_push_up_to_date() {
        let (_dir, local, _remote) = repo_pair();

        commit_file(&local, "a.txt", "a", "one");
        push(&local, "origin", "master").unwrap();

        let again = push(&local, "origin", "master").unwrap();
        assert_eq!(again.commits, 0);
        assert_eq!(again.stats.transferred(), 0);
    }

    #[test]
    fn test_push_new_branch() {
        let (_dir, local, remote) = repo_pair();

        let c1 = commit_file(&local, "a.txt", "a", "one");
        create_branch(&local, "feature").unwrap();

        push(&local, "origin", "feature").unwrap();

        assert_eq!(branch_tip(&remote, "feature").unwrap(), c1);
        assert_eq!(
            read_branch(&remote, "feature").unwrap().commits(),
            read_branch(&local, "master").unwrap().commits()
        );
    }

    #[test]
    fn test_push_needs_pull() {
        let (_dir, local, remote) = repo_pair();

        commit_file(&remote, "r.txt", "remote", "remote work");
        commit_file(&local, "l.txt", "local", "local work");

        let result = push(&local, "origin", "master");
        assert!(matches!(result, Err(Error::NeedsPull)));
    }

    #[test]
    fn test_push_missing_remote_dir() {
        let dir = tempdir().unwrap();
        let local = Repo::init(&dir.path().join("local")).unwrap();
        add_remote(&local, "origin", "../nowhere/.gitlet").unwrap();

        let result = push(&local, "origin", "master");
        assert!(matches!(result, Err(Error::RemoteDirNotFound(_))));
    }
}
