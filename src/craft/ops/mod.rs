//! Operations that sit above the core planner: loading craftfiles, running
//! a full build, and the side-effecting bits (`download`, `unarchive`) the
//! planner's task closures call into.

pub mod craftfile;
pub mod download;
pub mod entry;
pub mod unarchive;
