use tracing::info;

use crate::error::{Error, Result};
use crate::hash::Hash;
use crate::object::{read_commit, write_commit};
use crate::refs::{append_commit, current_branch};
use crate::repo::Repo;
use crate::stage::{clear_stage, read_stage};
use crate::types::{Commit, Stage};

/// commit the staged changes to the current branch
pub fn commit(repo: &Repo, message: &str) -> Result<Hash> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let stage = read_stage(repo)?;
    let branch = current_branch(repo)?;
    let hash = create_commit(repo, message, &stage, None)?;

    append_commit(repo, branch.name(), &hash)?;
    clear_stage(repo)?;

    info!(commit = %hash, branch = branch.name(), "committed");
    Ok(hash)
}

/// the commit at the tip of the current branch
pub fn head_commit(repo: &Repo) -> Result<Commit> {
    let branch = current_branch(repo)?;
    read_commit(repo, &branch.tip())
}

/// build a child of the current tip from `stage` and store it
///
/// the branch and the stage are left for the caller to update.
pub(crate) fn create_commit(
    repo: &Repo,
    message: &str,
    stage: &Stage,
    second_parent: Option<Hash>,
) -> Result<Hash> {
    let parent = head_commit(repo)?;
    let commit = Commit::new(message, &parent, stage, second_parent)?;
    write_commit(repo, &commit)
}
