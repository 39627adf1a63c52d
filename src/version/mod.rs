//! Version trees
//!
//! Each resource owns an arena of [`VersionNode`]s forming a tree rooted at
//! version 0. Snapshotted nodes are frozen; writing to one branches a new
//! open child instead.

mod node;
mod resource;
mod tree;

pub use node::{Snapshot, VersionId, VersionNode};
pub use resource::{VersionedResource, DEFAULT_ROOT_MESSAGE, DEFAULT_SNAPSHOT_MESSAGE};
pub use tree::{Ancestors, VersionTree, ROOT_ID};
