use std::fs;

use crate::error::{Error, Result};
use crate::fs::write_atomic;
use crate::repo::Repo;
use crate::types::Stage;

/// load the staging area (an absent stage file is an empty stage)
pub fn read_stage(repo: &Repo) -> Result<Stage> {
    let path = repo.stage_path();
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Stage::default()),
        Err(e) => return Err(Error::Io { path, source: e }),
    };
    Ok(ciborium::from_reader(&bytes[..])?)
}

/// persist the staging area, replacing the previous file atomically
pub fn write_stage(repo: &Repo, stage: &Stage) -> Result<()> {
    let mut bytes = Vec::new();
    ciborium::into_writer(stage, &mut bytes)?;
    write_atomic(&repo.tmp_path(), &repo.stage_path(), &bytes)
}

/// empty the staging area on disk
pub fn clear_stage(repo: &Repo) -> Result<()> {
    write_stage(repo, &Stage::default())
}
