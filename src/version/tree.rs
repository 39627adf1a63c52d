//! Arena holding every node of one resource
//!
//! Nodes are addressed by their dense id, which doubles as the id index:
//! node `n` lives at slot `n`, and ids are never reused.

use std::ops::{Index, IndexMut};

use chrono::{DateTime, Utc};

use super::node::{VersionId, VersionNode};
use crate::error::{ArborError, Result};

pub const ROOT_ID: VersionId = 0;

#[derive(Clone, Debug)]
pub struct VersionTree {
    nodes: Vec<VersionNode>,
}

impl VersionTree {
    /// Create a tree holding only a root node, snapshotted with `root_message`
    pub fn with_root(root_message: &str, at: DateTime<Utc>) -> Result<Self> {
        let mut root = VersionNode::new(ROOT_ID, String::new(), at);
        root.snapshot(root_message, at)?;
        Ok(Self { nodes: vec![root] })
    }

    pub fn root(&self) -> &VersionNode {
        &self.nodes[ROOT_ID]
    }

    pub fn get(&self, id: VersionId) -> Option<&VersionNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: VersionId) -> bool {
        id < self.nodes.len()
    }

    /// Number of nodes ever created
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionNode> {
        self.nodes.iter()
    }

    /// Allocate a new open node as a child of `parent`, returning its id
    pub fn branch(
        &mut self,
        parent: VersionId,
        content: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<VersionId> {
        if !self.contains(parent) {
            return Err(ArborError::NotFound(format!("version {}", parent)));
        }
        let id = self.nodes.len();
        self.nodes.push(VersionNode::new(id, content, at));
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Link `child` under `parent`.
    ///
    /// Idempotent for an existing link. A node's parent is set at most once;
    /// attaching a node that already hangs elsewhere, the root, or an
    /// ancestor of `parent` is rejected.
    pub fn add_child(&mut self, parent: VersionId, child: VersionId) -> Result<bool> {
        if !self.contains(parent) {
            return Err(ArborError::NotFound(format!("version {}", parent)));
        }
        let current_parent = self
            .get(child)
            .ok_or_else(|| ArborError::Validation(format!("no version {} to attach", child)))?
            .parent();

        match current_parent {
            Some(p) if p == parent => return Ok(false),
            Some(p) => {
                return Err(ArborError::State(format!(
                    "version {} already belongs to version {}",
                    child, p
                )))
            }
            None => {}
        }
        if child == ROOT_ID || self.ancestors(parent).any(|n| n.id() == child) {
            return Err(ArborError::State(format!(
                "attaching version {} under version {} would form a cycle",
                child, parent
            )));
        }

        self.nodes[parent].push_child(child);
        self.nodes[child].set_parent(parent);
        Ok(true)
    }

    /// Walk from `id` up to the root, `id` first
    pub fn ancestors(&self, id: VersionId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map(|n| n.id()),
        }
    }
}

impl Index<VersionId> for VersionTree {
    type Output = VersionNode;

    fn index(&self, id: VersionId) -> &VersionNode {
        &self.nodes[id]
    }
}

impl IndexMut<VersionId> for VersionTree {
    fn index_mut(&mut self, id: VersionId) -> &mut VersionNode {
        &mut self.nodes[id]
    }
}

pub struct Ancestors<'a> {
    tree: &'a VersionTree,
    next: Option<VersionId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a VersionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?)?;
        self.next = node.parent();
        Some(node)
    }
}
