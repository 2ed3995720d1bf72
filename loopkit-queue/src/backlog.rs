//! Bounded queue storage behind the idle queue scheduler
//!
//! Two flavors share the [`Backlog`] seam:
//! - [`FifoBacklog`]: ordered, duplicates allowed
//! - [`UniqueBacklog`]: insertion-ordered set; a duplicate add collapses
//!   into the existing entry without moving it

use std::collections::VecDeque;
use std::hash::Hash;

use indexmap::IndexSet;

/// Storage contract for an idle queue's backlog
pub trait Backlog<T> {
    /// Append `item`
    ///
    /// Returns `false` when the item collapsed into an already-present
    /// entry (unique storage only).
    fn add(&mut self, item: T) -> bool;

    /// Number of items held
    fn len(&self) -> usize;

    /// Whether the backlog holds no items
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return up to `n` items from the front, in insertion order
    ///
    /// Returns fewer than `n` items if the backlog holds fewer.
    fn take(&mut self, n: usize) -> Vec<T>;

    /// Drop all items
    fn clear(&mut self);
}

/// Ordered backlog; duplicates allowed, strictly FIFO
#[derive(Debug, Default)]
pub struct FifoBacklog<T> {
    items: VecDeque<T>,
}

impl<T> FifoBacklog<T> {
    /// Create an empty FIFO backlog
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Backlog<T> for FifoBacklog<T> {
    fn add(&mut self, item: T) -> bool {
        self.items.push_back(item);
        true
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn take(&mut self, n: usize) -> Vec<T> {
        let n = n.min(self.items.len());
        self.items.drain(..n).collect()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// Insertion-ordered unique backlog
///
/// Re-adding a present item is a no-op that keeps its original position.
#[derive(Debug, Default)]
pub struct UniqueBacklog<T: Hash + Eq> {
    items: IndexSet<T>,
}

impl<T: Hash + Eq> UniqueBacklog<T> {
    /// Create an empty unique backlog
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }
}

impl<T: Hash + Eq> Backlog<T> for UniqueBacklog<T> {
    fn add(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn take(&mut self, n: usize) -> Vec<T> {
        let n = n.min(self.items.len());
        self.items.drain(..n).collect()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}
