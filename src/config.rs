use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IoResultExt, Result};

/// name of the branch created by `init` unless configured otherwise
pub const DEFAULT_BRANCH: &str = "master";

/// repository configuration stored in config.toml
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// branch created (and checked out) by init
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// re-derive digests when reading blobs and commits
    #[serde(default)]
    pub verify_objects: bool,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl Config {
    /// load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_path(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// serialize to toml text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// set the initial branch name
    pub fn with_default_branch(mut self, name: impl Into<String>) -> Self {
        self.default_branch = name.into();
        self
    }

    /// enable digest verification on read
    pub fn with_verify_objects(mut self, verify: bool) -> Self {
        self.verify_objects = verify;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            verify_objects: false,
        }
    }
}
