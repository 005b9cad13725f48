//! named remotes: plain-text files holding the path of another repository root

use std::fs;
use std::path::{PathBuf, MAIN_SEPARATOR_STR};

use tracing::info;

use crate::error::{not_found_or_io, Error, IoResultExt, Result};
use crate::fs::write_atomic;
use crate::repo::Repo;

/// register a remote repository root under `name`
///
/// `/` in `path` is converted to the platform separator. relative paths are
/// resolved against the working tree when the remote is used.
pub fn add_remote(repo: &Repo, name: &str, path: &str) -> Result<()> {
    let file = remote_file(repo, name)?;
    if file.exists() {
        return Err(Error::RemoteExists(name.to_string()));
    }

    let native = path.replace('/', MAIN_SEPARATOR_STR);
    write_atomic(&repo.tmp_path(), &file, native.as_bytes())?;

    info!(remote = name, path = %native, "added remote");
    Ok(())
}

/// forget a remote; the remote repository itself is untouched
pub fn remove_remote(repo: &Repo, name: &str) -> Result<()> {
    let file = remote_file(repo, name)?;
    fs::remove_file(&file)
        .map_err(|e| not_found_or_io(e, &file, || Error::RemoteNotFound(name.to_string())))?;

    info!(remote = name, "removed remote");
    Ok(())
}

/// resolved root path of a remote
pub fn remote_path(repo: &Repo, name: &str) -> Result<PathBuf> {
    let file = remote_file(repo, name)?;
    let stored = fs::read_to_string(&file)
        .map_err(|e| not_found_or_io(e, &file, || Error::RemoteNotFound(name.to_string())))?;

    let path = PathBuf::from(stored.trim());
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(repo.work_dir().join(path))
    }
}

/// all registered remote names, sorted
pub fn list_remotes(repo: &Repo) -> Result<Vec<String>> {
    let dir = repo.remotes_path();
    let mut names = Vec::new();

    if !dir.exists() {
        return Ok(names);
    }

    for entry in fs::read_dir(&dir).with_path(&dir)? {
        let entry = entry.with_path(&dir)?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    Ok(names)
}

/// open the repository a remote points at
pub fn open_remote(repo: &Repo, name: &str) -> Result<Repo> {
    let path = remote_path(repo, name)?;
    Repo::open_store(&path).map_err(|e| match e {
        Error::NoRepo(path) => Error::RemoteDirNotFound(path),
        e => e,
    })
}

fn remote_file(repo: &Repo, name: &str) -> Result<PathBuf> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(Error::RemoteNotFound(name.to_string()));
    }
    Ok(repo.remotes_path().join(name))
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
    fn test_add_and_list_remotes() {
        let (_dir, repo) = test_repo();

        add_remote(&repo, "origin", "../other/.gitlet").unwrap();
        add_remote(&repo, "backup", "/srv/backup/.gitlet").unwrap();

        assert_eq!(list_remotes(&repo).unwrap(), vec!["backup", "origin"]);
        assert_eq!(
            remote_path(&repo, "origin").unwrap(),
            repo.work_dir().join("..").join("other").join(".gitlet")
        );
    }

    #[test]
    fn test_add_existing_remote() {
        let (_dir, repo) = test_repo();

        add_remote(&repo, "origin", "../a/.gitlet").unwrap();
        let result = add_remote(&repo, "origin", "../b/.gitlet");

        assert!(matches!(result, Err(Error::RemoteExists(_))));
    }

    #[test]
    fn test_remove_remote() {
        let (_dir, repo) = test_repo();

        add_remote(&repo, "origin", "../a/.gitlet").unwrap();
        remove_remote(&repo, "origin").unwrap();
        assert!(list_remotes(&repo).unwrap().is_empty());

        let result = remove_remote(&repo, "origin");
        assert!(matches!(result, Err(Error::RemoteNotFound(_))));
    }

    #[test]
    fn test_open_missing_remote_dir() {
        let (_dir, repo) = test_repo();

        add_remote(&repo, "origin", "../does-not-exist/.gitlet").unwrap();
        let result = open_remote(&repo, "origin");

        assert!(matches!(result, Err(Error::RemoteDirNotFound(_))));
    }

    #[test]
    fn test_open_remote() {
        let dir = tempdir().unwrap();
        let local = Repo::init(&dir.path().join("local")).unwrap();
        Repo::init(&dir.path().join("remote")).unwrap();

        add_remote(&local, "origin", "../remote/.gitlet").unwrap();
        let remote = open_remote(&local, "origin").unwrap();

        assert!(remote.path().ends_with(".gitlet"));
        assert!(remote.config_path().is_file());
    }
}
