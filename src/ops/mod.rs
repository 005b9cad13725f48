//! high-level operations on gitlet repositories

mod checkout;
mod commit;
mod log;
mod merge;
mod staging;
mod status;

pub use checkout::{checkout_branch, checkout_file, reset};
pub use commit::{commit, head_commit};
pub use log::{find, global_log, log, LogEntry};
pub use merge::{classify, merge, split_point, FileAction, MergeOutcome};
pub use staging::{add, rm};
pub use status::{status, Modification, Status};

pub use crate::refs::{create_branch, delete_branch};
