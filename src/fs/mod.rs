pub mod read;
pub mod write;

pub use read::{
    list_working_files, normalize_path, read_working_file, snapshot_working_tree, REPO_DIR_NAME,
};
pub use write::{fsync_dir, remove_working_file, write_atomic, write_working_file};
