//! A single content revision within a resource's version tree

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ArborError, Result};

/// Identifier of a node, unique within its resource
pub type VersionId = usize;

/// Message and time attached when a node is frozen
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub message: String,
    pub at: DateTime<Utc>,
}

/// One revision of a resource's content.
///
/// A node starts open and becomes permanently immutable once snapshotted.
/// Parent and children are stored as ids into the owning resource's arena.
#[derive(Clone, Debug, Serialize)]
pub struct VersionNode {
    id: VersionId,
    content: String,
    created_at: DateTime<Utc>,
    snapshot: Option<Snapshot>,
    parent: Option<VersionId>,
    children: Vec<VersionId>,
}

impl VersionNode {
    /// Create an open, unattached node
    pub fn new(id: VersionId, content: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content: content.into(),
            created_at,
            snapshot: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> VersionId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Snapshot message, empty while the node is open
    pub fn message(&self) -> &str {
        self.snapshot.as_ref().map_or("", |s| s.message.as_str())
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn snapshot_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.as_ref().map(|s| s.at)
    }

    pub fn is_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn parent(&self) -> Option<VersionId> {
        self.parent
    }

    pub fn children(&self) -> &[VersionId] {
        &self.children
    }

    /// Replace the content of an open node
    pub fn update_content(&mut self, content: impl Into<String>) -> Result<()> {
        if self.is_snapshot() {
            return Err(ArborError::State(format!(
                "version {} is snapshotted and cannot be modified",
                self.id
            )));
        }
        self.content = content.into();
        Ok(())
    }

    /// Freeze this node with a message. Irreversible.
    pub fn snapshot(&mut self, message: &str, at: DateTime<Utc>) -> Result<()> {
        if message.is_empty() {
            return Err(ArborError::Validation(
                "snapshot message must not be empty".to_string(),
            ));
        }
        if self.is_snapshot() {
            return Err(ArborError::State(format!(
                "version {} is already snapshotted",
                self.id
            )));
        }
        self.snapshot = Some(Snapshot {
            message: message.to_string(),
            at,
        });
        Ok(())
    }

    /// Record `child` as a child of this node. Returns false if it already was one.
    pub(crate) fn push_child(&mut self, child: VersionId) -> bool {
        if self.children.contains(&child) {
            return false;
        }
        self.children.push(child);
        true
    }

    pub(crate) fn set_parent(&mut self, parent: VersionId) {
        self.parent = Some(parent);
    }
}
