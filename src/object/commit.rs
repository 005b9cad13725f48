use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{not_found_or_io, Error, Result};
use crate::fs::write_atomic;
use crate::hash::{Hash, HASH_LEN};
use crate::repo::Repo;
use crate::types::Commit;

/// write a commit to the commit store, keyed by its own id
///
/// commits are serialized as CBOR. an already-stored id is not rewritten.
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Hash> {
    let path = commit_path(repo, &commit.id);

    // dedup: if commit already exists, we're done
    if path.exists() {
        return Ok(commit.id);
    }

    let mut bytes = Vec::new();
    ciborium::into_writer(commit, &mut bytes)?;
    write_atomic(&repo.tmp_path(), &path, &bytes)?;
    debug!(commit = %commit.id, "stored commit");

    Ok(commit.id)
}

/// read a commit from the commit store
pub fn read_commit(repo: &Repo, hash: &Hash) -> Result<Commit> {
    let path = commit_path(repo, hash);

    let bytes = fs::read(&path)
        .map_err(|e| not_found_or_io(e, &path, || Error::CommitNotFound(hash.to_hex())))?;
    let commit: Commit = ciborium::from_reader(&bytes[..])?;

    if commit.id != *hash
        || (repo.config().verify_objects && commit.compute_id() != commit.id)
    {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(commit)
}

/// get the filesystem path to a commit record
pub fn commit_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.logs_path().join(dir).join(file)
}

/// check if a commit exists in the commit store
pub fn commit_exists(repo: &Repo, hash: &Hash) -> bool {
    commit_path(repo, hash).exists()
}

/// list the ids of every stored commit
pub fn list_commits(repo: &Repo) -> Result<Vec<Hash>> {
    list_objects_in_dir(&repo.logs_path())
}

/// resolve a full or abbreviated commit id
///
/// a full id is looked up directly. a shorter hex prefix is matched by a
/// linear scan over all stored commits and must match exactly one.
pub fn resolve_commit(repo: &Repo, id: &str) -> Result<Hash> {
    let id = id.trim().to_ascii_lowercase();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::CommitNotFound(id));
    }

    if id.len() == HASH_LEN * 2 {
        let hash = Hash::from_hex(&id)?;
        if !commit_exists(repo, &hash) {
            return Err(Error::CommitNotFound(id));
        }
        return Ok(hash);
    }

    let matches: Vec<Hash> = list_commits(repo)?
        .into_iter()
        .filter(|h| h.to_hex().starts_with(&id))
        .collect();

    match matches.as_slice() {
        [hash] => Ok(*hash),
        [] => Err(Error::CommitNotFound(id)),
        _ => Err(Error::AmbiguousCommit(id)),
    }
}

/// list objects stored under a two-level fan-out directory
pub(crate) fn list_objects_in_dir(dir: &Path) -> Result<Vec<Hash>> {
    let mut hashes = Vec::new();

    if !dir.exists() {
        return Ok(hashes);
    }

    for entry in WalkDir::new(dir).min_depth(2).max_depth(2) {
        let entry = entry.map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")
            }),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let parent_name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("");

        let hex = format!("{}{}", parent_name, file_name);
        if let Ok(hash) = Hash::from_hex(&hex) {
            hashes.push(hash);
        }
    }

    hashes.sort();
    Ok(hashes)
}
