//! fetch and pull - bring a remote branch into the local repository

use tracing::info;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::ops::{merge, MergeOutcome};
use crate::refs::{read_branch, write_branch};
use crate::repo::Repo;
use crate::transport::local::{copy_commit, TransferStats};
use crate::transport::remote::open_remote;

/// fetch result
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// local tracking branch, `<remote>/<branch>`
    pub branch: String,
    pub tip: Hash,
    /// commits that were not stored locally before
    pub commits: usize,
    pub stats: TransferStats,
}

/// copy the history of a remote branch into the local tracking branch
/// `<remote>/<branch>`, creating or replacing it
pub fn fetch(repo: &Repo, remote_name: &str, branch: &str) -> Result<FetchResult> {
    let remote = open_remote(repo, remote_name)?;
    let remote_branch = read_branch(&remote, branch).map_err(|e| match e {
        Error::BranchNotFound(_) => Error::RemoteBranchNotFound(branch.to_string()),
        e => e,
    })?;

    let mut stats = TransferStats::default();
    let mut commits = 0;
    for hash in remote_branch.commits().iter().rev() {
        if copy_commit(&remote, repo, hash, &mut stats)? {
            commits += 1;
        }
    }

    let tracking = remote_branch.fork(format!("{}/{}", remote_name, branch));
    write_branch(repo, &tracking)?;

    info!(
        remote = remote_name,
        branch = tracking.name(),
        tip = %tracking.tip(),
        commits,
        "fetched"
    );

    Ok(FetchResult {
        branch: tracking.name().to_string(),
        tip: tracking.tip(),
        commits,
        stats,
    })
}

/// fetch, then merge the tracking branch into the current branch
pub fn pull(repo: &Repo, remote_name: &str, branch: &str) -> Result<MergeOutcome> {
    let fetched = fetch(repo, remote_name, branch)?;
    merge(repo, &fetched.branch)
}
