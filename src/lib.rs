//! gitlet - a miniature version-control system
//!
//! snapshots of a working directory are recorded as content-addressed
//! commits inside `<work-tree>/.gitlet`, with named branches, a staging
//! area, three-way merging and push/fetch between repositories on the same
//! machine.
//!
//! # Core concepts
//!
//! - **Blob**: raw file bytes, keyed by their SHA-1 digest
//! - **Commit**: an immutable snapshot (message, timestamp, up to two
//!   parents, path -> blob mapping), keyed by a digest of those fields
//! - **Branch**: a named, most-recent-first list of commit digests
//! - **Stage**: files staged for addition or removal in the next commit
//! - **Remote**: a name bound to the root directory of another repository
//!
//! # Layout
//!
//! ```text
//! .gitlet/config.toml
//! .gitlet/objects/ab/cdef...   blobs
//! .gitlet/logs/ab/cdef...      commits (CBOR)
//! .gitlet/branches/<name>      branch histories (CBOR)
//! .gitlet/HEAD                 active branch name
//! .gitlet/stage                staging area (CBOR)
//! .gitlet/remote/<name>        path to another repository root
//! ```
//!
//! # Example usage
//!
//! ```no_run
//! use gitlet::{ops, Repo};
//! use std::path::Path;
//!
//! let repo = Repo::init(Path::new("/path/to/work")).unwrap();
//!
//! ops::add(&repo, "notes.txt").unwrap();
//! ops::commit(&repo, "add notes").unwrap();
//!
//! ops::create_branch(&repo, "feature").unwrap();
//! ops::checkout_branch(&repo, "feature").unwrap();
//! ```

mod config;
mod error;
mod hash;
mod object;
mod refs;
mod repo;
mod stage;

pub mod fs;
pub mod ops;
pub mod transport;
pub mod types;

pub use config::{Config, DEFAULT_BRANCH};
pub use error::{Error, Result};
pub use hash::{compute_blob_hash, Hash};
pub use object::{
    blob_exists, commit_exists, list_commits, read_blob, read_commit, resolve_commit, write_blob,
    write_commit,
};
pub use refs::{
    append_commit, branch_exists, branch_tip, current_branch, list_branches, read_branch,
    read_head, write_branch, write_head,
};
pub use repo::Repo;
pub use stage::{clear_stage, read_stage, write_stage};
pub use types::{Branch, Commit, Stage, INITIAL_COMMIT_MESSAGE};
