use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};
use crate::fs::{write_atomic, REPO_DIR_NAME};
use crate::object::write_commit;
use crate::refs::{write_branch, write_head};
use crate::stage::write_stage;
use crate::types::{Branch, Commit, Stage};

/// a gitlet repository: the `.gitlet` root plus the working tree around it
///
/// every operation takes a `&Repo`; nothing is resolved from the process
/// working directory.
#[derive(Debug, Clone)]
pub struct Repo {
    work_dir: PathBuf,
    path: PathBuf,
    config: Config,
}

impl Repo {
    /// initialize a new repository in `work_dir` with default configuration
    pub fn init(work_dir: &Path) -> Result<Self> {
        Self::init_with_config(work_dir, Config::default())
    }

    /// initialize a new repository in `work_dir`
    ///
    /// creates the layout, an empty stage, the root commit, the default
    /// branch pointing at it, and HEAD.
    pub fn init_with_config(work_dir: &Path, config: Config) -> Result<Self> {
        let path = work_dir.join(REPO_DIR_NAME);
        if path.exists() {
            return Err(Error::RepoExists(path));
        }

        // create directory structure
        for dir in ["objects", "logs", "branches", "remote", "tmp"] {
            std::fs::create_dir_all(path.join(dir)).with_path(&path)?;
        }

        let repo = Self {
            work_dir: work_dir.to_path_buf(),
            path,
            config,
        };
        repo.save_config()?;

        write_stage(&repo, &Stage::default())?;

        let root = Commit::root();
        write_commit(&repo, &root)?;

        let branch = Branch::new(repo.config.default_branch.clone(), root.id);
        write_branch(&repo, &branch)?;
        write_head(&repo, branch.name())?;

        info!(path = %repo.path.display(), branch = branch.name(), "initialized repository");
        Ok(repo)
    }

    /// open the repository inside an existing working tree
    pub fn open(work_dir: &Path) -> Result<Self> {
        let mut repo = Self::open_store(&work_dir.join(REPO_DIR_NAME))?;
        repo.work_dir = work_dir.to_path_buf();
        Ok(repo)
    }

    /// open a repository by its root (`.gitlet`) directory
    ///
    /// the working tree is taken to be the root's parent.
    pub fn open_store(path: &Path) -> Result<Self> {
        let config_path = path.join("config.toml");
        if !config_path.is_file() {
            return Err(Error::NoRepo(path.to_path_buf()));
        }

        let config = Config::load(&config_path)?;
        let work_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            work_dir,
            path: path.to_path_buf(),
            config,
        })
    }

    /// repository root path (the `.gitlet` directory)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// working tree root
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// mutable access to configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// save configuration changes
    pub fn save_config(&self) -> Result<()> {
        let content = self.config.to_toml()?;
        write_atomic(&self.tmp_path(), &self.config_path(), content.as_bytes())
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.toml")
    }

    /// path to blob directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to commit directory
    pub fn logs_path(&self) -> PathBuf {
        self.path.join("logs")
    }

    /// path to branch directory
    pub fn branches_path(&self) -> PathBuf {
        self.path.join("branches")
    }

    /// path to remote registry directory
    pub fn remotes_path(&self) -> PathBuf {
        self.path.join("remote")
    }

    /// path to HEAD file
    pub fn head_path(&self) -> PathBuf {
        self.path.join("HEAD")
    }

    /// path to stage file
    pub fn stage_path(&self) -> PathBuf {
        self.path.join("stage")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }

    /// absolute location of a logical working file path
    pub fn working_path(&self, logical_path: &str) -> PathBuf {
        self.work_dir.join(logical_path)
    }
}
