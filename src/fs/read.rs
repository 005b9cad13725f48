use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{not_found_or_io, Error, IoResultExt, Result};
use crate::hash::{compute_blob_hash, Hash};

/// name of the repository directory inside a working tree
pub const REPO_DIR_NAME: &str = ".gitlet";

/// normalize a user-supplied working file path to its `/`-separated logical form
///
/// rejects empty, absolute and parent-escaping paths, and paths inside the
/// repository directory.
pub fn normalize_path(path: &str) -> Result<String> {
    let mut parts = Vec::new();

    for component in Path::new(path).components() {
        match component {
            Component::Normal(name) => {
                let name = name
                    .to_str()
                    .ok_or_else(|| Error::InvalidPath(path.to_string()))?;
                parts.push(name);
            }
            Component::CurDir => {}
            _ => return Err(Error::InvalidPath(path.to_string())),
        }
    }

    if parts.is_empty() || parts[0] == REPO_DIR_NAME {
        return Err(Error::InvalidPath(path.to_string()));
    }

    Ok(parts.join("/"))
}

/// read a working file, mapping a missing file to FileNotFound
pub fn read_working_file(work_dir: &Path, logical_path: &str) -> Result<Vec<u8>> {
    let path = work_dir.join(logical_path);
    if !path.is_file() {
        return Err(Error::FileNotFound(logical_path.to_string()));
    }
    fs::read(&path).map_err(|e| {
        not_found_or_io(e, &path, || Error::FileNotFound(logical_path.to_string()))
    })
}

/// list all plain files in the working tree as sorted logical paths
///
/// the repository directory is skipped entirely.
pub fn list_working_files(work_dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(work_dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == REPO_DIR_NAME));

    for entry in walker {
        let entry = entry.map_err(|e| Error::Io {
            path: work_dir.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::Other, "walkdir error")
            }),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(work_dir)
            .map_err(|_| Error::InvalidPath(entry.path().display().to_string()))?;
        let logical: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        files.push(logical.join("/"));
    }

    files.sort();
    Ok(files)
}

/// digest every working file (path -> blob hash)
pub fn snapshot_working_tree(work_dir: &Path) -> Result<BTreeMap<String, Hash>> {
    let mut snapshot = BTreeMap::new();
    for logical in list_working_files(work_dir)? {
        let path = work_dir.join(&logical);
        let content = fs::read(&path).with_path(&path)?;
        snapshot.insert(logical, compute_blob_hash(&content));
    }
    Ok(snapshot)
}
