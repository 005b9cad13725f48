use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::{IoResultExt, Result};

/// write a file atomically: temp file -> fsync -> rename -> fsync parent
///
/// `tmp_dir` must live on the same filesystem as `dest` so the rename is atomic.
pub fn write_atomic(tmp_dir: &Path, dest: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    let tmp_path = tmp_dir.join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file.write_all(content).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    if let Err(e) = fs::rename(&tmp_path, dest) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_path(dest);
    }

    if let Some(parent) = dest.parent() {
        fsync_dir(parent)?;
    }

    Ok(())
}

/// overwrite (or create) a file in the working tree
pub fn write_working_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }
    fs::write(path, content).with_path(path)
}

/// delete a file from the working tree, ignoring files that are already gone
pub fn remove_working_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_path(path),
    }
}

/// sync a directory to disk
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
