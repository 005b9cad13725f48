use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// a named, ordered commit history, most recent first
///
/// the history is never empty: the first element is the tip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    name: String,
    commits: Vec<Hash>,
}

impl Branch {
    /// a branch whose only commit is `tip`
    pub fn new(name: impl Into<String>, tip: Hash) -> Self {
        Self {
            name: name.into(),
            commits: vec![tip],
        }
    }

    /// a branch with an explicit tip-first history
    ///
    /// returns None for an empty history.
    pub fn from_history(name: impl Into<String>, commits: Vec<Hash>) -> Option<Self> {
        if commits.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            commits,
        })
    }

    /// a new branch inheriting (a copy of) this branch's history
    pub fn fork(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commits: self.commits.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// most recent commit
    pub fn tip(&self) -> Hash {
        self.commits[0]
    }

    /// full history, tip first
    pub fn commits(&self) -> &[Hash] {
        &self.commits
    }

    /// record a new tip
    pub fn push(&mut self, commit: Hash) {
        self.commits.insert(0, commit);
    }

    /// position of `commit` in the history (0 = tip)
    pub fn position(&self, commit: &Hash) -> Option<usize> {
        self.commits.iter().position(|c| c == commit)
    }

    pub fn contains(&self, commit: &Hash) -> bool {
        self.position(commit).is_some()
    }

    /// commits newer than `commit`, tip first
    ///
    /// None when `commit` is not in this history.
    pub fn commits_since(&self, commit: &Hash) -> Option<&[Hash]> {
        self.position(commit).map(|idx| &self.commits[..idx])
    }

    pub(crate) fn is_valid(&self) -> bool {
        !self.commits.is_empty()
    }
}
