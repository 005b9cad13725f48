//! transport layer for remote operations

pub mod fetch;
pub mod local;
pub mod push;
pub mod remote;

pub use fetch::{fetch, pull, FetchResult};
pub use local::{copy_commit, TransferStats};
pub use push::{push, PushResult};
pub use remote::{add_remote, list_remotes, open_remote, remote_path, remove_remote};
