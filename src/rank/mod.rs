//! Rank indexes
//!
//! A [`RankIndex`] is a max-heap whose elements can be re-ranked in place
//! after their ordering attributes change, found through a position map
//! rather than a linear scan.

mod index;

pub use index::{RankIndex, Ranked};
