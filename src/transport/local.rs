//! local file transport between repositories

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{IoResultExt, Result};
use crate::hash::Hash;
use crate::object::{blob_path, commit_exists, commit_path, read_commit};
use crate::repo::Repo;

/// transfer statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransferStats {
    pub copied: usize,
    pub hardlinked: usize,
    pub skipped: usize,
    pub bytes_transferred: u64,
}

impl TransferStats {
    /// objects newly stored at the destination
    pub fn transferred(&self) -> usize {
        self.copied + self.hardlinked
    }
}

/// copy a commit and the blobs it references from `src` to `dst`
///
/// blobs go first so a stored commit never references a missing blob.
/// returns false when `dst` already had the commit.
pub fn copy_commit(src: &Repo, dst: &Repo, hash: &Hash, stats: &mut TransferStats) -> Result<bool> {
    if commit_exists(dst, hash) {
        stats.skipped += 1;
        return Ok(false);
    }

    let commit = read_commit(src, hash)?;
    for blob in commit.files.values() {
        copy_object(
            &blob_path(src, blob),
            &blob_path(dst, blob),
            &dst.tmp_path(),
            stats,
        )?;
    }

    copy_object(
        &commit_path(src, hash),
        &commit_path(dst, hash),
        &dst.tmp_path(),
        stats,
    )?;

    debug!(commit = %hash, "copied commit");
    Ok(true)
}

/// copy a single object file
fn copy_object(src_path: &Path, dst_path: &Path, tmp_dir: &Path, stats: &mut TransferStats) -> Result<()> {
    if dst_path.exists() {
        stats.skipped += 1;
        return Ok(());
    }

    // ensure parent directory exists
    if let Some(parent) = dst_path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    // try hardlink first (same filesystem), fall back to copy
    if fs::hard_link(src_path, dst_path).is_ok() {
        stats.hardlinked += 1;
    } else {
        let content = fs::read(src_path).with_path(src_path)?;
        stats.bytes_transferred += content.len() as u64;
        crate::fs::write_atomic(tmp_dir, dst_path, &content)?;
        stats.copied += 1;
    }

    Ok(())
}
