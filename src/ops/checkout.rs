use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::{list_working_files, normalize_path, remove_working_file, write_working_file};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit, resolve_commit};
use crate::ops::commit::head_commit;
use crate::refs::{
    append_commit, branch_exists, branch_tip, current_branch, list_branches, read_head,
    write_head,
};
use crate::repo::Repo;
use crate::stage::{clear_stage, read_stage};
use crate::types::Stage;

/// switch the working tree and HEAD to another branch
///
/// fails without touching anything if an untracked file would be
/// overwritten. the staging area is cleared on success.
pub fn checkout_branch(repo: &Repo, name: &str) -> Result<()> {
    if !branch_exists(repo, name) {
        return Err(Error::NoSuchBranch(name.to_string()));
    }
    let head = read_head(repo)?;
    if head == name {
        return Err(Error::AlreadyOnBranch(name.to_string()));
    }

    let current = read_commit(repo, &branch_tip(repo, &head)?)?;
    let target = read_commit(repo, &branch_tip(repo, name)?)?;
    let stage = read_stage(repo)?;

    let tracked = tracked_by_other_branches(repo, name)?;
    ensure_no_untracked_conflict(repo, &tracked, &stage, &target.files)?;

    apply_snapshot(repo, &current.files, &target.files)?;
    clear_stage(repo)?;
    write_head(repo, name)?;

    info!(from = %head, to = name, "switched branch");
    Ok(())
}

/// restore one file from a commit (the current tip when `rev` is None)
///
/// the staging area is not touched.
pub fn checkout_file(repo: &Repo, rev: Option<&str>, path: &str) -> Result<()> {
    let path = normalize_path(path)?;
    let commit = match rev {
        Some(rev) => read_commit(repo, &resolve_commit(repo, rev)?)?,
        None => head_commit(repo)?,
    };

    let hash = commit
        .blob(&path)
        .ok_or_else(|| Error::FileNotInCommit(path.clone()))?;
    let content = read_blob(repo, hash)?;
    write_working_file(&repo.working_path(&path), &content)?;

    debug!(path = %path, commit = %commit.id, "restored file");
    Ok(())
}

/// move the working tree to an arbitrary commit and record it as the new
/// tip of the current branch
pub fn reset(repo: &Repo, rev: &str) -> Result<Hash> {
    let target_id = resolve_commit(repo, rev)?;
    let target = read_commit(repo, &target_id)?;

    let branch = current_branch(repo)?;
    let current = read_commit(repo, &branch.tip())?;
    let stage = read_stage(repo)?;

    let tracked: BTreeSet<String> = current.files.keys().cloned().collect();
    ensure_no_untracked_conflict(repo, &tracked, &stage, &target.files)?;

    apply_snapshot(repo, &current.files, &target.files)?;
    clear_stage(repo)?;

    if branch.tip() != target_id {
        append_commit(repo, branch.name(), &target_id)?;
    }

    info!(branch = branch.name(), commit = %target_id, "reset");
    Ok(target_id)
}

/// paths tracked by the tip of any branch other than `target`
fn tracked_by_other_branches(repo: &Repo, target: &str) -> Result<BTreeSet<String>> {
    let mut tracked = BTreeSet::new();
    for name in list_branches(repo)?.into_iter().filter(|n| n != target) {
        let commit = read_commit(repo, &branch_tip(repo, &name)?)?;
        tracked.extend(commit.files.into_keys());
    }
    Ok(tracked)
}

/// fail if a working file that is neither staged nor in `tracked` would be
/// overwritten by `incoming`
pub(crate) fn ensure_no_untracked_conflict(
    repo: &Repo,
    tracked: &BTreeSet<String>,
    stage: &Stage,
    incoming: &BTreeMap<String, Hash>,
) -> Result<()> {
    for path in list_working_files(repo.work_dir())? {
        let untracked =
            !stage.is_staged(&path) && !stage.is_removed(&path) && !tracked.contains(&path);
        if untracked && incoming.contains_key(&path) {
            return Err(Error::UntrackedFileConflict(path));
        }
    }
    Ok(())
}

/// make the working tree match `target`: write its files and delete the
/// ones only `current` tracks
pub(crate) fn apply_snapshot(
    repo: &Repo,
    current: &BTreeMap<String, Hash>,
    target: &BTreeMap<String, Hash>,
) -> Result<()> {
    for (path, hash) in target {
        let content = read_blob(repo, hash)?;
        write_working_file(&repo.working_path(path), &content)?;
        debug!(path = %path, blob = %hash, "wrote working file");
    }

    for path in current.keys().filter(|p| !target.contains_key(*p)) {
        remove_working_file(&repo.working_path(path))?;
        debug!(path = %path, "removed working file");
    }

    Ok(())
}
