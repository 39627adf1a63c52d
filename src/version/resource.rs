//! Named resource with a branching history of snapshots
//!
//! Mutations follow a copy-on-write rule: an open active node is edited in
//! place, while a snapshotted one spawns a new child that becomes active.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::node::{VersionId, VersionNode};
use super::tree::{VersionTree, ROOT_ID};
use crate::clock::{Clock, SystemClock};
use crate::error::{ArborError, Result};

pub const DEFAULT_ROOT_MESSAGE: &str = "This is the root";
pub const DEFAULT_SNAPSHOT_MESSAGE: &str = "This version has been snapshotted";

pub struct VersionedResource {
    name: String,
    tree: VersionTree,
    active: VersionId,
    last_modified: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for VersionedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedResource")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("total_versions", &self.total_versions())
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

impl VersionedResource {
    /// Create a resource on the system clock with the default root message
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::with_clock(name, DEFAULT_ROOT_MESSAGE, Arc::new(SystemClock::new()))
    }

    /// Create a resource whose root is snapshotted with `root_message`
    pub fn with_clock(
        name: impl Into<String>,
        root_message: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let now = clock.now();
        let tree = VersionTree::with_root(root_message, now)?;
        Ok(Self {
            name: name.into(),
            tree,
            active: ROOT_ID,
            last_modified: now,
            clock,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Count of nodes ever created; ids run `0..total_versions`
    pub fn total_versions(&self) -> usize {
        self.tree.len()
    }

    pub fn active(&self) -> &VersionNode {
        &self.tree[self.active]
    }

    pub fn root(&self) -> &VersionNode {
        self.tree.root()
    }

    pub fn version(&self, id: VersionId) -> Option<&VersionNode> {
        self.tree.get(id)
    }

    pub fn tree(&self) -> &VersionTree {
        &self.tree
    }

    /// Content of the active version
    pub fn read(&self) -> &str {
        self.active().content()
    }

    /// Append `text` to the active content. Returns the id of the node written.
    pub fn insert(&mut self, text: &str) -> Result<VersionId> {
        let content = format!("{}{}", self.read(), text);
        self.write(content)
    }

    /// Replace the active content with `text`. Returns the id of the node written.
    pub fn update(&mut self, text: &str) -> Result<VersionId> {
        self.write(text.to_string())
    }

    fn write(&mut self, content: String) -> Result<VersionId> {
        let now = self.clock.now();
        if self.active().is_snapshot() {
            let parent = self.active;
            let id = self.tree.branch(parent, content, now)?;
            log::debug!("{}: branched version {} from {}", self.name, id, parent);
            self.active = id;
        } else {
            self.active_mut().update_content(content)?;
        }
        self.last_modified = now;
        Ok(self.active)
    }

    /// Freeze the active version with `message`
    pub fn snapshot(&mut self, message: &str) -> Result<VersionId> {
        let now = self.clock.now();
        self.active_mut().snapshot(message, now)?;
        log::debug!("{}: snapshotted version {}", self.name, self.active);
        Ok(self.active)
    }

    /// Freeze the active version with the default message
    pub fn snapshot_default(&mut self) -> Result<VersionId> {
        self.snapshot(DEFAULT_SNAPSHOT_MESSAGE)
    }

    /// Make the active version's parent active
    pub fn rollback_to_parent(&mut self) -> Result<VersionId> {
        let parent = self.active().parent().ok_or_else(|| {
            ArborError::State("already at root; cannot roll back to parent".to_string())
        })?;
        log::debug!("{}: rollback {} -> {}", self.name, self.active, parent);
        self.active = parent;
        Ok(parent)
    }

    /// Jump straight to version `id`, wherever it sits in the tree
    pub fn rollback_to(&mut self, id: VersionId) -> Result<VersionId> {
        if !self.tree.contains(id) {
            return Err(ArborError::NotFound(format!(
                "version {} of '{}'",
                id, self.name
            )));
        }
        log::debug!("{}: rollback {} -> {}", self.name, self.active, id);
        self.active = id;
        Ok(id)
    }

    /// Snapshotted versions from the root down to the active one
    pub fn history(&self) -> Vec<&VersionNode> {
        let mut snapshots: Vec<_> = self
            .tree
            .ancestors(self.active)
            .filter(|n| n.is_snapshot())
            .collect();
        snapshots.reverse();
        snapshots
    }

    fn active_mut(&mut self) -> &mut VersionNode {
        &mut self.tree[self.active]
    }
}
