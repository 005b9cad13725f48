use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// pending changes between the working tree and the next commit
///
/// a path is never in both `additions` and `removals`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// path -> blob hash staged for addition
    pub additions: BTreeMap<String, Hash>,
    /// paths staged for removal
    pub removals: BTreeSet<String>,
}

impl Stage {
    /// nothing staged
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    /// stage `path` for addition with the given blob
    pub fn stage_addition(&mut self, path: impl Into<String>, hash: Hash) {
        let path = path.into();
        self.removals.remove(&path);
        self.additions.insert(path, hash);
    }

    /// stage `path` for removal
    pub fn stage_removal(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.additions.remove(&path);
        self.removals.insert(path);
    }

    /// drop `path` from both sets (working copy matches the tip)
    pub fn forget(&mut self, path: &str) {
        self.additions.remove(path);
        self.removals.remove(path);
    }

    /// drop `path` from additions, returning whether it was staged
    pub fn unstage_addition(&mut self, path: &str) -> bool {
        self.additions.remove(path).is_some()
    }

    pub fn is_staged(&self, path: &str) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_removed(&self, path: &str) -> bool {
        self.removals.contains(path)
    }

    /// empty both sets
    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
    }
}
