use tracing::debug;

use crate::error::{Error, Result};
use crate::fs::{normalize_path, read_working_file, remove_working_file};
use crate::hash::compute_blob_hash;
use crate::object::write_blob;
use crate::ops::commit::head_commit;
use crate::repo::Repo;
use crate::stage::{read_stage, write_stage};

/// stage a working file for addition
///
/// a file identical to the tip's version is dropped from the stage instead.
pub fn add(repo: &Repo, path: &str) -> Result<()> {
    let path = normalize_path(path)?;
    let content = read_working_file(repo.work_dir(), &path)?;
    let hash = compute_blob_hash(&content);

    let head = head_commit(repo)?;
    let mut stage = read_stage(repo)?;

    if head.blob(&path) == Some(&hash) {
        stage.forget(&path);
        debug!(path = %path, "working copy matches tip, nothing staged");
    } else {
        write_blob(repo, &content)?;
        stage.stage_addition(path.as_str(), hash);
        debug!(path = %path, blob = %hash, "staged for addition");
    }

    write_stage(repo, &stage)
}

/// unstage a file, and if the tip tracks it, stage its removal and delete
/// the working copy
pub fn rm(repo: &Repo, path: &str) -> Result<()> {
    let path = normalize_path(path)?;

    let head = head_commit(repo)?;
    let mut stage = read_stage(repo)?;

    let was_staged = stage.unstage_addition(&path);
    let tracked = head.tracks(&path);
    if !was_staged && !tracked {
        return Err(Error::NothingToRemove(path));
    }

    if tracked {
        remove_working_file(&repo.working_path(&path))?;
        stage.stage_removal(path.as_str());
        debug!(path = %path, "staged for removal");
    }

    write_stage(repo, &stage)
}
