use std::collections::BTreeSet;
use std::fmt;

use crate::error::Result;
use crate::fs::snapshot_working_tree;
use crate::ops::commit::head_commit;
use crate::refs::{list_branches, read_head};
use crate::repo::Repo;
use crate::stage::read_stage;

/// how a working file differs from what would be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    Modified,
    Deleted,
}

impl fmt::Display for Modification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modification::Modified => write!(f, "modified"),
            Modification::Deleted => write!(f, "deleted"),
        }
    }
}

/// snapshot of branches, stage and working tree; every list is sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub current_branch: String,
    pub branches: Vec<String>,
    pub staged: Vec<String>,
    pub removed: Vec<String>,
    pub modified: Vec<(String, Modification)>,
    pub untracked: Vec<String>,
}

/// compare the tip, the stage and the working tree
pub fn status(repo: &Repo) -> Result<Status> {
    let current_branch = read_head(repo)?;
    let branches = list_branches(repo)?;
    let head = head_commit(repo)?;
    let stage = read_stage(repo)?;
    let working = snapshot_working_tree(repo.work_dir())?;

    let mut modified = Vec::new();
    let candidates: BTreeSet<&String> = head.files.keys().chain(stage.additions.keys()).collect();
    for path in candidates {
        let expected = match stage.additions.get(path.as_str()) {
            Some(staged) => staged,
            None if stage.is_removed(path) => continue,
            None => match head.blob(path) {
                Some(tracked) => tracked,
                None => continue,
            },
        };

        match working.get(path.as_str()) {
            None => modified.push((path.clone(), Modification::Deleted)),
            Some(actual) if actual != expected => {
                modified.push((path.clone(), Modification::Modified))
            }
            Some(_) => {}
        }
    }

    let untracked = working
        .keys()
        .filter(|path| {
            (!stage.is_staged(path) && !head.tracks(path)) || stage.is_removed(path)
        })
        .cloned()
        .collect();

    Ok(Status {
        current_branch,
        branches,
        staged: stage.additions.keys().cloned().collect(),
        removed: stage.removals.iter().cloned().collect(),
        modified,
        untracked,
    })
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            if *branch == self.current_branch {
                writeln!(f, "*{}", branch)?;
            } else {
                writeln!(f, "{}", branch)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, kind) in &self.modified {
            writeln!(f, "{} ({})", path, kind)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked {
            writeln!(f, "{}", path)?;
        }
        writeln!(f)
    }
}
