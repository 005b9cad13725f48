use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{not_found_or_io, Error, Result};
use crate::fs::write_atomic;
use crate::hash::{compute_blob_hash, Hash};
use crate::repo::Repo;

/// write a blob to the object store
///
/// returns the blob hash. writing identical bytes again is a no-op.
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Hash> {
    let hash = compute_blob_hash(content);
    let path = blob_path(repo, &hash);

    // deduplication: if blob already exists, we're done
    if path.exists() {
        return Ok(hash);
    }

    write_atomic(&repo.tmp_path(), &path, content)?;
    debug!(%hash, bytes = content.len(), "stored blob");

    Ok(hash)
}

/// get the filesystem path to a blob
pub fn blob_path(repo: &Repo, hash: &Hash) -> PathBuf {
    let (dir, file) = hash.to_path_components();
    repo.objects_path().join(dir).join(file)
}

/// check if a blob exists in the object store
pub fn blob_exists(repo: &Repo, hash: &Hash) -> bool {
    blob_path(repo, hash).exists()
}

/// read blob content
pub fn read_blob(repo: &Repo, hash: &Hash) -> Result<Vec<u8>> {
    let path = blob_path(repo, hash);
    let content = fs::read(&path).map_err(|e| not_found_or_io(e, &path, || Error::ObjectNotFound(*hash)))?;

    if repo.config().verify_objects && compute_blob_hash(&content) != *hash {
        return Err(Error::CorruptObject(*hash));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_write_and_read_blob() {
        let (_dir, repo) = test_repo();

        let content = b"hello, world!";
        let hash = write_blob(&repo, content).unwrap();

        // verify it exists
        assert!(blob_exists(&repo, &hash));

        // read it back
        let read_content = read_blob(&repo, &hash).unwrap();
        assert_eq!(read_content, content);
    }

    #[test]
    fn test_blob_deduplication() {
        let (_dir, repo) = test_repo();

        let content = b"duplicate content";
        let h1 = write_blob(&repo, content).unwrap();
        let modified = fs::metadata(blob_path(&repo, &h1)).unwrap().modified().unwrap();
        let h2 = write_blob(&repo, content).unwrap();

        assert_eq!(h1, h2);
        // the stored file was not rewritten
        let after = fs::metadata(blob_path(&repo, &h2)).unwrap().modified().unwrap();
        assert_eq!(modified, after);
    }

    #[test]
    fn test_blob_path_structure() {
        let (_dir, repo) = test_repo();

        let hash = write_blob(&repo, b"test").unwrap();
        let path = blob_path(&repo, &hash);

        // path should be objects/XX/YYYY...
        let hex = hash.to_hex();
        assert!(path.ends_with(format!("{}/{}", &hex[..2], &hex[2..])));
    }

    #[test]
    fn test_read_nonexistent_blob() {
        let (_dir, repo) = test_repo();

        let result = read_blob(&repo, &Hash::ZERO);

        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_verify_detects_corruption() {
        let dir = tempdir().unwrap();
        let config = crate::Config::default().with_verify_objects(true);
        let repo = Repo::init_with_config(dir.path(), config).unwrap();

        let hash = write_blob(&repo, b"original").unwrap();
        fs::write(blob_path(&repo, &hash), b"tampered").unwrap();

        let result = read_blob(&repo, &hash);
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }
}
