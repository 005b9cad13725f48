use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::hash::{FieldHasher, Hash};
use crate::types::Stage;

/// message of the root commit created by init
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// timestamp layout, e.g. "Thu Jan 1 00:00:00 1970 +0000"
const DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// an immutable snapshot: message, timestamp, up to two parents and a file mapping
///
/// `id` is the digest of the other fields. two commits with identical
/// metadata and files share an id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// digest of this commit
    pub id: Hash,
    /// unix timestamp (seconds since epoch)
    pub timestamp: i64,
    /// commit message
    pub message: String,
    /// first parent (None only for the root commit)
    pub parent: Option<Hash>,
    /// second parent, set on merge commits
    pub second_parent: Option<Hash>,
    /// tracked path -> blob hash (BTreeMap for deterministic serialization)
    pub files: BTreeMap<String, Hash>,
}

impl Commit {
    /// the root commit: epoch timestamp, no parents, no files
    pub fn root() -> Self {
        Self::build(0, INITIAL_COMMIT_MESSAGE, None, None, BTreeMap::new())
    }

    /// create a child of `parent` from the staged changes
    ///
    /// fails with EmptyCommit when nothing is staged, unless this is a merge
    /// commit (a second parent is given).
    pub fn new(
        message: impl Into<String>,
        parent: &Commit,
        stage: &Stage,
        second_parent: Option<Hash>,
    ) -> Result<Self> {
        Self::with_timestamp(message, parent, stage, second_parent, Utc::now().timestamp())
    }

    /// create a child commit with an explicit timestamp
    pub fn with_timestamp(
        message: impl Into<String>,
        parent: &Commit,
        stage: &Stage,
        second_parent: Option<Hash>,
        timestamp: i64,
    ) -> Result<Self> {
        if stage.is_empty() && second_parent.is_none() {
            return Err(Error::EmptyCommit);
        }

        let mut files = parent.files.clone();
        for (path, hash) in &stage.additions {
            files.insert(path.clone(), *hash);
        }
        for path in &stage.removals {
            files.remove(path);
        }

        Ok(Self::build(
            timestamp,
            message,
            Some(parent.id),
            second_parent,
            files,
        ))
    }

    fn build(
        timestamp: i64,
        message: impl Into<String>,
        parent: Option<Hash>,
        second_parent: Option<Hash>,
        files: BTreeMap<String, Hash>,
    ) -> Self {
        let mut commit = Self {
            id: Hash::ZERO,
            timestamp,
            message: message.into(),
            parent,
            second_parent,
            files,
        };
        commit.id = commit.compute_id();
        commit
    }

    /// derive the digest from (formatted timestamp, message, parents, file mapping)
    ///
    /// an absent parent contributes the empty string.
    pub fn compute_id(&self) -> Hash {
        FieldHasher::new()
            .field(&self.hashed_timestamp())
            .field(&self.message)
            .field(&self.parent.map(|h| h.to_hex()).unwrap_or_default())
            .field(&self.second_parent.map(|h| h.to_hex()).unwrap_or_default())
            .field(&self.canonical_files())
            .finalize()
    }

    /// canonical text form of the file mapping: `{a=<hex>, b=<hex>}`
    pub fn canonical_files(&self) -> String {
        let mut out = String::from("{");
        for (i, (path, hash)) in self.files.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={}", path, hash);
        }
        out.push('}');
        out
    }

    /// timestamp rendered in UTC (stable input to the digest)
    fn hashed_timestamp(&self) -> String {
        self.utc_datetime().format(DATE_FORMAT).to_string()
    }

    /// timestamp rendered in local time for display
    pub fn display_date(&self) -> String {
        self.utc_datetime()
            .with_timezone(&Local)
            .format(DATE_FORMAT)
            .to_string()
    }

    fn utc_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.timestamp, 0).unwrap_or_default()
    }

    /// blob hash recorded for `path`, if tracked
    pub fn blob(&self, path: &str) -> Option<&Hash> {
        self.files.get(path)
    }

    /// is `path` tracked by this commit
    pub fn tracks(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// is this the root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// is this a merge commit (two parents)
    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::compute_blob_hash;

    fn stage_with(path: &str, content: &[u8]) -> Stage {
        let mut stage = Stage::default();
        stage.stage_addition(path, compute_blob_hash(content));
        stage
    }

    #[test]
    fn test_root_commit() {
        let root = Commit::root();
        assert_eq!(root.timestamp, 0);
        assert_eq!(root.message, INITIAL_COMMIT_MESSAGE);
        assert!(root.is_root());
        assert!(!root.is_merge());
        assert!(root.files.is_empty());
        assert_eq!(root.id, root.compute_id());
    }

    #[test]
    fn test_root_commit_is_deterministic() {
        assert_eq!(Commit::root().id, Commit::root().id);
    }

    #[test]
    fn test_root_timestamp_format() {
        let root = Commit::root();
        assert_eq!(root.hashed_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
    }

    #[test]
    fn test_empty_stage_rejected() {
        let root = Commit::root();
        let result = Commit::new("nothing", &root, &Stage::default(), None);
        assert!(matches!(result, Err(Error::EmptyCommit)));
    }

    #[test]
    fn test_merge_commit_allows_empty_stage() {
        let root = Commit::root();
        let other = Hash::from_hex("1111111111111111111111111111111111111111").unwrap();
        let merge = Commit::new("merge", &root, &Stage::default(), Some(other)).unwrap();
        assert!(merge.is_merge());
        assert_eq!(merge.second_parent, Some(other));
    }

    #[test]
    fn test_child_overlays_stage() {
        let root = Commit::root();
        let mut stage = stage_with("a.txt", b"a");
        stage.stage_addition("b.txt", compute_blob_hash(b"b"));
        let c1 = Commit::with_timestamp("two files", &root, &stage, None, 100).unwrap();

        let mut stage = stage_with("a.txt", b"a2");
        stage.stage_removal("b.txt");
        let c2 = Commit::with_timestamp("edit", &c1, &stage, None, 200).unwrap();

        assert_eq!(c2.parent, Some(c1.id));
        assert_eq!(c2.blob("a.txt"), Some(&compute_blob_hash(b"a2")));
        assert!(!c2.tracks("b.txt"));
        // the parent is untouched
        assert!(c1.tracks("b.txt"));
    }

    #[test]
    fn test_identical_metadata_collides() {
        let root = Commit::root();
        let stage = stage_with("f.txt", b"same");
        let c1 = Commit::with_timestamp("msg", &root, &stage, None, 42).unwrap();
        let c2 = Commit::with_timestamp("msg", &root, &stage, None, 42).unwrap();
        assert_eq!(c1.id, c2.id);

        let c3 = Commit::with_timestamp("other msg", &root, &stage, None, 42).unwrap();
        assert_ne!(c1.id, c3.id);

        let c4 = Commit::with_timestamp("msg", &root, &stage, None, 43).unwrap();
        assert_ne!(c1.id, c4.id);
    }

    #[test]
    fn test_canonical_files() {
        let root = Commit::root();
        assert_eq!(root.canonical_files(), "{}");

        let mut stage = stage_with("b", b"2");
        stage.stage_addition("a", compute_blob_hash(b"1"));
        let c = Commit::with_timestamp("m", &root, &stage, None, 1).unwrap();
        let text = c.canonical_files();
        assert!(text.starts_with("{a="));
        assert!(text.contains(", b="));
    }

    #[test]
    fn test_commit_cbor_roundtrip() {
        let root = Commit::root();
        let c = Commit::with_timestamp("m", &root, &stage_with("x", b"y"), None, 5).unwrap();

        let mut bytes = Vec::new();
        ciborium::into_writer(&c, &mut bytes).unwrap();

        let parsed: Commit = ciborium::from_reader(&bytes[..]).unwrap();
        assert_eq!(c, parsed);
        assert_eq!(parsed.compute_id(), parsed.id);
    }
}
