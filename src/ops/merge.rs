use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::fs::{remove_working_file, write_working_file};
use crate::hash::Hash;
use crate::object::{read_blob, read_commit};
use crate::ops::checkout::{apply_snapshot, ensure_no_untracked_conflict};
use crate::ops::commit::create_commit;
use crate::refs::{branch_exists, current_branch, read_branch, write_branch};
use crate::repo::Repo;
use crate::stage::{clear_stage, read_stage, write_stage};
use crate::types::{Branch, Stage};

/// what a merge does to one path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// check out the given branch's version and stage it
    TakeGiven(Hash),
    /// delete the file and stage its removal
    RemoveGiven,
    /// leave the current version alone
    KeepCurrent,
    /// both sides changed the file differently since the split point
    Conflict,
}

/// result of a successful merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// the current branch was an ancestor of the given branch and now
    /// points at its tip; no merge commit was made
    FastForwarded(Hash),
    /// a two-parent merge commit was recorded
    Merged {
        commit: Hash,
        /// paths left untouched because both sides diverged
        conflicts: Vec<String>,
    },
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty())
    }
}

/// classify one path from its blob in the split point, the current tip and
/// the given tip
pub fn classify(split: Option<&Hash>, current: Option<&Hash>, given: Option<&Hash>) -> FileAction {
    match (split, current, given) {
        // changed only on the given side
        (Some(s), Some(c), Some(g)) if c == s && g != s => FileAction::TakeGiven(*g),
        // new only on the given side
        (None, None, Some(g)) => FileAction::TakeGiven(*g),
        // deleted only on the given side
        (Some(s), Some(c), None) if c == s => FileAction::RemoveGiven,
        (s, c, g) if c != s && g != s && c != g => FileAction::Conflict,
        _ => FileAction::KeepCurrent,
    }
}

/// most recent commit of `current`'s history that also appears in `given`'s
pub fn split_point(current: &Branch, given: &Branch) -> Result<Hash> {
    current
        .commits()
        .iter()
        .find(|c| given.contains(c))
        .copied()
        .ok_or_else(|| Error::NoCommonAncestor {
            current: current.name().to_string(),
            given: given.name().to_string(),
        })
}

/// merge branch `given` into the current branch
pub fn merge(repo: &Repo, given: &str) -> Result<MergeOutcome> {
    let stage = read_stage(repo)?;
    if !stage.is_empty() {
        return Err(Error::DirtyStage);
    }
    if !branch_exists(repo, given) {
        return Err(Error::BranchNotFound(given.to_string()));
    }

    let current = current_branch(repo)?;
    if current.name() == given {
        return Err(Error::SelfMerge);
    }
    let other = read_branch(repo, given)?;

    let current_commit = read_commit(repo, &current.tip())?;
    let given_commit = read_commit(repo, &other.tip())?;

    let tracked: BTreeSet<String> = current_commit.files.keys().cloned().collect();
    ensure_no_untracked_conflict(repo, &tracked, &stage, &given_commit.files)?;

    let split = split_point(&current, &other)?;
    if split == other.tip() {
        return Err(Error::AlreadyUpToDate);
    }
    if split == current.tip() {
        return fast_forward(repo, &current, &other);
    }

    let split_commit = read_commit(repo, &split)?;
    debug!(current = %current.tip(), given = %other.tip(), split = %split, "merging");

    let mut staged = Stage::default();
    let mut conflicts = Vec::new();
    let paths: BTreeSet<&String> = given_commit
        .files
        .keys()
        .chain(split_commit.files.keys())
        .collect();

    for path in paths {
        let action = classify(
            split_commit.blob(path),
            current_commit.blob(path),
            given_commit.blob(path),
        );

        match action {
            FileAction::TakeGiven(hash) => {
                let content = read_blob(repo, &hash)?;
                write_working_file(&repo.working_path(path), &content)?;
                staged.stage_addition(path.as_str(), hash);
            }
            FileAction::RemoveGiven => {
                remove_working_file(&repo.working_path(path))?;
                staged.stage_removal(path.as_str());
            }
            FileAction::Conflict => conflicts.push(path.clone()),
            FileAction::KeepCurrent => {}
        }
        debug!(path = %path, ?action, "merge action");
    }

    write_stage(repo, &staged)?;

    let message = format!("Merged {} into {}.", given, current.name());
    let commit = create_commit(repo, &message, &staged, Some(other.tip()))?;

    let history = merged_history(&current, &other, &split, commit);
    let merged = Branch::from_history(current.name(), history)
        .ok_or_else(|| Error::CorruptBranch(current.name().to_string()))?;
    write_branch(repo, &merged)?;
    clear_stage(repo)?;

    info!(commit = %commit, given, conflicts = conflicts.len(), "merged");
    Ok(MergeOutcome::Merged { commit, conflicts })
}

/// history after a merge commit: the merge commit, the current side's own
/// commits, the given side's own commits, then the shared ancestry
fn merged_history(current: &Branch, given: &Branch, split: &Hash, merge_commit: Hash) -> Vec<Hash> {
    let idx = current.position(split).unwrap_or(current.commits().len());
    let given_only = given
        .commits_since(split)
        .unwrap_or_default()
        .iter()
        .filter(|h| !current.contains(h));

    let mut history = vec![merge_commit];
    history.extend_from_slice(&current.commits()[..idx]);
    history.extend(given_only.copied());
    history.extend_from_slice(&current.commits()[idx..]);
    history
}

/// move the current branch up to the given tip and check out its snapshot
fn fast_forward(repo: &Repo, current: &Branch, given: &Branch) -> Result<MergeOutcome> {
    let ahead = given.commits_since(&current.tip()).unwrap_or_default();
    let mut history = ahead.to_vec();
    history.extend_from_slice(current.commits());

    let updated = Branch::from_history(current.name(), history).ok_or_else(|| {
        Error::CorruptBranch(current.name().to_string())
    })?;

    let from = read_commit(repo, &current.tip())?;
    let to = read_commit(repo, &given.tip())?;
    apply_snapshot(repo, &from.files, &to.files)?;
    clear_stage(repo)?;
    write_branch(repo, &updated)?;

    info!(branch = current.name(), tip = %given.tip(), "fast-forwarded");
    Ok(MergeOutcome::FastForwarded(given.tip()))
}
