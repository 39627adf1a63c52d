//! Name-keyed registry of versioned resources
//!
//! Owns every resource plus two rank indexes (most recently modified, most
//! versions). Every mutating call re-ranks the touched resource in both
//! indexes before returning, so top-k queries always see current values.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::error::{ArborError, Result};
use crate::rank::{RankIndex, Ranked};
use crate::version::{
    VersionId, VersionNode, VersionedResource, DEFAULT_ROOT_MESSAGE, DEFAULT_SNAPSHOT_MESSAGE,
};

/// Ranking attributes of one resource, as held by the rank indexes
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResourceRank {
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub total_versions: usize,
}

impl ResourceRank {
    pub fn of(resource: &VersionedResource) -> Self {
        Self {
            name: resource.name().to_string(),
            last_modified: resource.last_modified(),
            total_versions: resource.total_versions(),
        }
    }
}

impl Ranked for ResourceRank {
    type Key = String;

    fn rank_key(&self) -> &String {
        &self.name
    }
}

fn by_recency(a: &ResourceRank, b: &ResourceRank) -> Ordering {
    a.last_modified.cmp(&b.last_modified)
}

fn by_versions(a: &ResourceRank, b: &ResourceRank) -> Ordering {
    a.total_versions.cmp(&b.total_versions)
}

/// Messages used when the caller does not supply one
#[derive(Clone, Debug)]
pub struct Messages {
    pub root: String,
    pub snapshot: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT_MESSAGE.to_string(),
            snapshot: DEFAULT_SNAPSHOT_MESSAGE.to_string(),
        }
    }
}

pub struct Registry {
    resources: HashMap<String, VersionedResource>,
    recent: RankIndex<ResourceRank>,
    biggest: RankIndex<ResourceRank>,
    messages: Messages,
    clock: Arc<dyn Clock>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry on the system clock with default messages
    pub fn new() -> Self {
        Self::with_clock(Messages::default(), Arc::new(SystemClock::new()))
    }

    pub fn with_clock(messages: Messages, clock: Arc<dyn Clock>) -> Self {
        Self {
            resources: HashMap::new(),
            recent: RankIndex::new(by_recency),
            biggest: RankIndex::new(by_versions),
            messages,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&VersionedResource> {
        self.resources.get(name)
    }

    /// Create an empty resource and index it
    pub fn create(&mut self, name: &str) -> Result<&VersionedResource> {
        if name.is_empty() {
            return Err(ArborError::Validation(
                "resource name must not be empty".to_string(),
            ));
        }
        if self.exists(name) {
            return Err(ArborError::State(format!("'{}' already exists", name)));
        }

        let resource =
            VersionedResource::with_clock(name, &self.messages.root, self.clock.clone())?;
        let rank = ResourceRank::of(&resource);
        self.recent.insert(rank.clone())?;
        self.biggest.insert(rank)?;
        log::debug!("created resource '{}'", name);

        Ok(&*self.resources.entry(name.to_string()).or_insert(resource))
    }

    pub fn read(&self, name: &str) -> Result<&str> {
        Ok(self.resource(name)?.read())
    }

    /// Append to the active version; returns the node written
    pub fn insert(&mut self, name: &str, text: &str) -> Result<&VersionNode> {
        self.mutate(name, |r| r.insert(text))
    }

    /// Replace the active content; returns the node written
    pub fn update(&mut self, name: &str, text: &str) -> Result<&VersionNode> {
        self.mutate(name, |r| r.update(text))
    }

    /// Snapshot the active version, falling back to the default message
    pub fn snapshot(&mut self, name: &str, message: Option<&str>) -> Result<&VersionNode> {
        let message = message.unwrap_or(&self.messages.snapshot).to_string();
        self.mutate(name, |r| r.snapshot(&message))
    }

    pub fn rollback_to_parent(&mut self, name: &str) -> Result<&VersionNode> {
        self.mutate(name, |r| r.rollback_to_parent())
    }

    pub fn rollback_to(&mut self, name: &str, id: VersionId) -> Result<&VersionNode> {
        self.mutate(name, |r| r.rollback_to(id))
    }

    pub fn history(&self, name: &str) -> Result<Vec<&VersionNode>> {
        Ok(self.resource(name)?.history())
    }

    /// The `k` most recently modified resources, newest first
    pub fn recent(&mut self, k: usize) -> Result<Vec<ResourceRank>> {
        self.recent.top_k(k)
    }

    /// The `k` resources with the most versions, largest first
    pub fn biggest(&mut self, k: usize) -> Result<Vec<ResourceRank>> {
        self.biggest.top_k(k)
    }

    fn resource(&self, name: &str) -> Result<&VersionedResource> {
        self.resources
            .get(name)
            .ok_or_else(|| ArborError::NotFound(format!("'{}'", name)))
    }

    /// Apply `op` to the named resource, then re-rank it in both indexes
    fn mutate(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut VersionedResource) -> Result<VersionId>,
    ) -> Result<&VersionNode> {
        let resource = self
            .resources
            .get_mut(name)
            .ok_or_else(|| ArborError::NotFound(format!("'{}'", name)))?;

        let id = op(resource)?;
        let rank = ResourceRank::of(resource);
        self.recent.reprioritize(rank.clone())?;
        self.biggest.reprioritize(rank)?;

        Ok(&resource.tree()[id])
    }
}
