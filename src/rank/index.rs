//! Max-heap with a position map for direct-access re-prioritization

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::error::{ArborError, Result};

/// An element that can be tracked by a [`RankIndex`]
pub trait Ranked {
    type Key: Hash + Eq + Clone + fmt::Display;

    /// Identity of the element; at most one element per key is indexed
    fn rank_key(&self) -> &Self::Key;
}

type Order<T> = Box<dyn Fn(&T, &T) -> Ordering>;

/// Binary max-heap ordered by a caller-supplied comparator.
///
/// `positions` mirrors `slots`: for every indexed element `e`,
/// `positions[e.rank_key()]` is the slot holding `e`. Every structural change
/// goes through `swap`, `push_slot` or `pop_slot`, which update both sides
/// together.
pub struct RankIndex<T: Ranked> {
    slots: Vec<T>,
    positions: HashMap<T::Key, usize>,
    order: Order<T>,
}

impl<T: Ranked> RankIndex<T> {
    /// `order(a, b) == Greater` means `a` ranks above `b`
    pub fn new(order: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self {
            slots: Vec::new(),
            positions: HashMap::new(),
            order: Box::new(order),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.positions.contains_key(key)
    }

    /// Current slot of the element with `key`
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.position(key).map(|i| &self.slots[i])
    }

    /// Elements in heap-array order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    /// Highest ranked element
    pub fn peek(&self) -> Result<&T> {
        self.slots.first().ok_or_else(empty)
    }

    pub fn insert(&mut self, element: T) -> Result<()> {
        if self.contains(element.rank_key()) {
            return Err(ArborError::Validation(format!(
                "'{}' is already indexed",
                element.rank_key()
            )));
        }
        let idx = self.push_slot(element);
        self.sift_up(idx);
        Ok(())
    }

    /// Remove and return the highest ranked element
    pub fn extract_max(&mut self) -> Result<T> {
        let last = self.slots.len().checked_sub(1).ok_or_else(empty)?;
        self.swap(0, last);
        let max = self.pop_slot().ok_or_else(empty)?;
        if !self.slots.is_empty() {
            self.sift_down(0);
        }
        Ok(max)
    }

    /// Replace the indexed element sharing `element`'s key and restore heap order
    pub fn reprioritize(&mut self, element: T) -> Result<()> {
        let idx = self.position(element.rank_key()).ok_or_else(|| {
            ArborError::NotFound(format!("'{}' is not indexed", element.rank_key()))
        })?;
        self.slots[idx] = element;
        let idx = self.sift_up(idx);
        self.sift_down(idx);
        Ok(())
    }

    /// The `k` highest ranked elements, best first, leaving the index intact
    pub fn top_k(&mut self, k: usize) -> Result<Vec<T>>
    where
        T: Clone,
    {
        if k == 0 {
            return Err(ArborError::Validation("k must be positive".to_string()));
        }
        if k > self.len() {
            return Err(ArborError::Validation(format!(
                "k cannot exceed the number of entries ({})",
                self.len()
            )));
        }

        let mut top = Vec::with_capacity(k);
        for _ in 0..k {
            top.push(self.extract_max()?);
        }
        for element in &top {
            self.insert(element.clone())?;
        }
        Ok(top)
    }

    fn outranks(&self, a: usize, b: usize) -> bool {
        (self.order)(&self.slots[a], &self.slots[b]) == Ordering::Greater
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.slots.swap(i, j);
        self.positions.insert(self.slots[i].rank_key().clone(), i);
        self.positions.insert(self.slots[j].rank_key().clone(), j);
    }

    fn push_slot(&mut self, element: T) -> usize {
        let idx = self.slots.len();
        self.positions.insert(element.rank_key().clone(), idx);
        self.slots.push(element);
        idx
    }

    fn pop_slot(&mut self) -> Option<T> {
        let element = self.slots.pop()?;
        self.positions.remove(element.rank_key());
        Some(element)
    }

    /// Returns the slot the element settled in
    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.outranks(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.slots.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut best = i;

            if left < n && self.outranks(left, best) {
                best = left;
            }
            if right < n && self.outranks(right, best) {
                best = right;
            }
            if best == i {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }
}

fn empty() -> ArborError {
    ArborError::NotFound("rank index is empty".to_string())
}

impl<T: Ranked + fmt::Debug> fmt::Debug for RankIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankIndex")
            .field("slots", &self.slots)
            .finish_non_exhaustive()
    }
}
