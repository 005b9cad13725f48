pub mod blob;
pub mod commit;

pub use blob::{blob_exists, blob_path, read_blob, write_blob};
pub use commit::{
    commit_exists, commit_path, list_commits, read_commit, resolve_commit, write_commit,
};
