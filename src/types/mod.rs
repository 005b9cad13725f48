mod branch;
mod commit;
mod stage;

pub use branch::Branch;
pub use commit::{Commit, INITIAL_COMMIT_MESSAGE};
pub use stage::Stage;
