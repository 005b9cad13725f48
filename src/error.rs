use std::path::PathBuf;

use crate::Hash;

/// error type for gitlet operations
///
/// precondition variants carry the exact message a front end prints.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not in an initialized Gitlet directory.")]
    NoRepo(PathBuf),

    #[error("A Gitlet version-control system already exists in the current directory.")]
    RepoExists(PathBuf),

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    EmptyCommit,

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id prefix {0} is ambiguous.")]
    AmbiguousCommit(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("A branch with that name already exists.")]
    BranchExists(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("corrupt branch record: {0}")]
    CorruptBranch(String),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileConflict(String),

    #[error("You have uncommitted changes.")]
    DirtyStage,

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("Given branch is an ancestor of the current branch.")]
    AlreadyUpToDate,

    #[error("No common ancestor between {current} and {given}.")]
    NoCommonAncestor { current: String, given: String },

    #[error("A remote with that name already exists.")]
    RemoteExists(String),

    #[error("A remote with that name does not exist.")]
    RemoteNotFound(String),

    #[error("Remote directory not found.")]
    RemoteDirNotFound(PathBuf),

    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound(String),

    #[error("Please pull down remote changes before pushing.")]
    NeedsPull,

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Hash),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("invalid working file path: {0}")]
    InvalidPath(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cbor serialization error: {0}")]
    CborEncode(#[from] ciborium::ser::Error<std::io::Error>),

    #[error("cbor deserialization error: {0}")]
    CborDecode(#[from] ciborium::de::Error<std::io::Error>),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}

/// map a NotFound io error to a domain error, keeping path context otherwise
pub(crate) fn not_found_or_io(
    err: std::io::Error,
    path: impl Into<PathBuf>,
    not_found: impl FnOnce() -> Error,
) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        not_found()
    } else {
        Error::Io {
            path: path.into(),
            source: err,
        }
    }
}
