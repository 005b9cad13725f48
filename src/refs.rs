use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{not_found_or_io, Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::hash::Hash;
use crate::repo::Repo;
use crate::types::Branch;

/// write a branch record (create or update)
///
/// names can contain slashes for hierarchical branches like "origin/master"
pub fn write_branch(repo: &Repo, branch: &Branch) -> Result<()> {
    validate_branch_name(branch.name())?;
    check_namespace(repo, branch.name())?;

    let mut bytes = Vec::new();
    ciborium::into_writer(branch, &mut bytes)?;
    write_atomic(&repo.tmp_path(), &branch_path(repo, branch.name()), &bytes)
}

/// read a branch record
pub fn read_branch(repo: &Repo, name: &str) -> Result<Branch> {
    validate_branch_name(name)?;
    let path = branch_path(repo, name);

    if path.is_dir() {
        return Err(Error::BranchNotFound(name.to_string()));
    }
    let bytes = fs::read(&path)
        .map_err(|e| not_found_or_io(e, &path, || Error::BranchNotFound(name.to_string())))?;

    let branch: Branch = ciborium::from_reader(&bytes[..])?;
    if !branch.is_valid() {
        return Err(Error::CorruptBranch(name.to_string()));
    }
    Ok(branch)
}

/// check if a branch exists
pub fn branch_exists(repo: &Repo, name: &str) -> bool {
    validate_branch_name(name).is_ok() && branch_path(repo, name).is_file()
}

/// list all branch names, sorted
pub fn list_branches(repo: &Repo) -> Result<Vec<String>> {
    let dir = repo.branches_path();
    let mut names = Vec::new();

    if dir.exists() {
        collect_branches(&dir, &dir, &mut names)?;
    }

    names.sort();
    Ok(names)
}

/// name of the active branch
pub fn read_head(repo: &Repo) -> Result<String> {
    let path = repo.head_path();
    let content = fs::read_to_string(&path).with_path(&path)?;
    Ok(content.trim().to_string())
}

/// point HEAD at a branch
pub fn write_head(repo: &Repo, name: &str) -> Result<()> {
    validate_branch_name(name)?;
    write_atomic(&repo.tmp_path(), &repo.head_path(), name.as_bytes())
}

/// the active branch record
pub fn current_branch(repo: &Repo) -> Result<Branch> {
    let head = read_head(repo)?;
    read_branch(repo, &head)
}

/// create a branch at the current branch's history
///
/// the new branch gets its own copy of the history.
pub fn create_branch(repo: &Repo, name: &str) -> Result<Branch> {
    validate_branch_name(name)?;
    if branch_exists(repo, name) {
        return Err(Error::BranchExists(name.to_string()));
    }

    let branch = current_branch(repo)?.fork(name);
    write_branch(repo, &branch)?;

    info!(branch = name, tip = %branch.tip(), "created branch");
    Ok(branch)
}

/// tip commit of a branch
pub fn branch_tip(repo: &Repo, name: &str) -> Result<Hash> {
    Ok(read_branch(repo, name)?.tip())
}

/// record a new tip on a branch
pub fn append_commit(repo: &Repo, name: &str, commit: &Hash) -> Result<()> {
    let mut branch = read_branch(repo, name)?;
    branch.push(*commit);
    write_branch(repo, &branch)
}

/// delete a branch pointer; commits are left in place
///
/// the active branch cannot be deleted.
pub fn delete_branch(repo: &Repo, name: &str) -> Result<()> {
    if !branch_exists(repo, name) {
        return Err(Error::BranchNotFound(name.to_string()));
    }
    if read_head(repo)? == name {
        return Err(Error::RemoveCurrentBranch(name.to_string()));
    }

    let path = branch_path(repo, name);
    fs::remove_file(&path)
        .map_err(|e| not_found_or_io(e, &path, || Error::BranchNotFound(name.to_string())))?;
    prune_empty_dirs(&repo.branches_path(), &path);

    info!(branch = name, "deleted branch");
    Ok(())
}

/// get filesystem path for a branch
fn branch_path(repo: &Repo, name: &str) -> PathBuf {
    repo.branches_path().join(name)
}

/// a branch file cannot share its path with a namespace directory, and no
/// prefix of its name may itself be a branch
fn check_namespace(repo: &Repo, name: &str) -> Result<()> {
    if branch_path(repo, name).is_dir() {
        return Err(Error::InvalidBranchName(format!(
            "branch name is used as a namespace: {}",
            name
        )));
    }

    let mut rest = name;
    while let Some((parent, _)) = rest.rsplit_once('/') {
        if branch_path(repo, parent).is_file() {
            return Err(Error::InvalidBranchName(format!(
                "branch {} already exists, cannot create {}",
                parent, name
            )));
        }
        rest = parent;
    }
    Ok(())
}

/// recursively collect branches from directory
fn collect_branches(base: &Path, dir: &Path, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();

        if path.is_dir() {
            collect_branches(base, &path, names)?;
        } else if path.is_file() {
            // branch name relative to base, always '/'-separated
            if let Ok(rel) = path.strip_prefix(base) {
                let parts: Vec<_> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                names.push(parts.join("/"));
            }
        }
    }
    Ok(())
}

/// remove now-empty namespace directories left by a hierarchical branch
fn prune_empty_dirs(base: &Path, removed: &Path) {
    let mut dir = removed.parent();
    while let Some(d) = dir {
        if d == base || fs::remove_dir(d).is_err() {
            break;
        }
        dir = d.parent();
    }
}

/// validate branch name
fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidBranchName("empty branch name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidBranchName(format!(
            "branch name cannot contain '//': {}",
            name
        )));
    }

    if name.contains('\0') || name.contains('\\') {
        return Err(Error::InvalidBranchName(format!(
            "branch name contains an invalid character: {}",
            name
        )));
    }

    // check for path traversal
    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidBranchName(format!(
                "branch name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}
