//! Indexed binary min-heap with decrease-key.
//!
//! The heap stores node indices, not nodes. Keys, colors and heap
//! positions live in parallel arrays addressed by the same index space as
//! the training graph, so `update` can find an element in O(1) and restore
//! order in O(log n).
//!
//! Ties on equal keys go to the element inserted first, which keeps
//! training runs reproducible.
//!
//! # Examples
//!
//! ```
//! use opforest::heap::{Color, IndexedHeap};
//!
//! let mut heap = IndexedHeap::new(3);
//! heap.set_key(0, 5.0).expect("node 0 is white");
//! heap.set_key(2, 1.0).expect("node 2 is white");
//! heap.insert(0).expect("node 0 is white");
//! heap.insert(2).expect("node 2 is white");
//! heap.update(0, 0.5).expect("node 0 is queued with a larger key");
//!
//! assert_eq!(heap.extract_min().expect("non-empty"), 0);
//! assert_eq!(heap.color(0), Color::Black);
//! assert_eq!(heap.extract_min().expect("non-empty"), 2);
//! assert!(heap.is_empty());
//! ```

use std::cmp::Ordering;

use crate::error::{OpfError, Result};

/// Queue membership of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Never queued.
    White,
    /// Currently in the queue.
    Gray,
    /// Extracted; its key is final.
    Black,
}

/// Min-heap over node indices keyed by path cost.
#[derive(Debug, Clone)]
pub struct IndexedHeap {
    key: Vec<f32>,
    color: Vec<Color>,
    // Insertion order, used to break key ties.
    stamp: Vec<u64>,
    // Position of each index inside `heap`; None when not queued.
    pos: Vec<Option<usize>>,
    heap: Vec<usize>,
    next_stamp: u64,
}

impl IndexedHeap {
    /// Creates a heap over `n` indices, all white with key `+inf`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            key: vec![f32::INFINITY; n],
            color: vec![Color::White; n],
            stamp: vec![0; n],
            pos: vec![None; n],
            heap: Vec::with_capacity(n),
            next_stamp: 0,
        }
    }

    /// Number of indices the heap was sized for.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.key.len()
    }

    /// Number of queued (gray) indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Current key of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn key(&self, index: usize) -> f32 {
        self.key[index]
    }

    /// Current color of `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn color(&self, index: usize) -> Color {
        self.color[index]
    }

    /// Sets the key of a node that has not been queued yet.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::InvalidState`] if `index` is out of range or not white.
    pub fn set_key(&mut self, index: usize, key: f32) -> Result<()> {
        self.expect_color(index, Color::White, "set_key")?;
        self.key[index] = key;
        Ok(())
    }

    /// Queues a white node under its current key.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::InvalidState`] if the node is already queued or finalized.
    pub fn insert(&mut self, index: usize) -> Result<()> {
        self.expect_color(index, Color::White, "insert")?;
        self.color[index] = Color::Gray;
        self.stamp[index] = self.next_stamp;
        self.next_stamp += 1;

        let at = self.heap.len();
        self.heap.push(index);
        self.pos[index] = Some(at);
        self.sift_up(at);
        Ok(())
    }

    /// Lowers the key of a queued node.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::InvalidState`] if the node is not gray or the new
    /// key is not strictly smaller than the current one.
    pub fn update(&mut self, index: usize, new_key: f32) -> Result<()> {
        self.expect_color(index, Color::Gray, "update")?;
        if new_key.partial_cmp(&self.key[index]) != Some(Ordering::Less) {
            return Err(OpfError::invalid_state(format!(
                "update of node {index} must decrease its key ({} -> {new_key})",
                self.key[index]
            )));
        }
        self.key[index] = new_key;
        let at = self.pos[index]
            .ok_or_else(|| OpfError::invalid_state(format!("gray node {index} has no position")))?;
        self.sift_up(at);
        Ok(())
    }

    /// Removes and returns the index with the smallest key, marking it black.
    ///
    /// # Errors
    ///
    /// Returns [`OpfError::InvalidState`] if the heap is empty.
    pub fn extract_min(&mut self) -> Result<usize> {
        let last = self
            .heap
            .len()
            .checked_sub(1)
            .ok_or_else(|| OpfError::invalid_state("extract_min on an empty queue"))?;

        self.swap(0, last);
        let min = self.heap.pop().ok_or_else(|| OpfError::invalid_state("heap underflow"))?;
        self.pos[min] = None;
        self.color[min] = Color::Black;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    fn expect_color(&self, index: usize, wanted: Color, op: &str) -> Result<()> {
        match self.color.get(index) {
            None => Err(OpfError::invalid_state(format!(
                "{op}: index {index} out of range (capacity {})",
                self.capacity()
            ))),
            Some(&c) if c != wanted => Err(OpfError::invalid_state(format!(
                "{op}: node {index} is {c:?}, expected {wanted:?}"
            ))),
            Some(_) => Ok(()),
        }
    }

    // Strict heap order: smaller key first, then earlier insertion.
    fn precedes(&self, a: usize, b: usize) -> bool {
        self.key[a]
            .total_cmp(&self.key[b])
            .then(self.stamp[a].cmp(&self.stamp[b]))
            == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos[self.heap[i]] = Some(i);
        self.pos[self.heap[j]] = Some(j);
    }

    fn sift_up(&mut self, mut at: usize) {
        while at > 0 {
            let parent = (at - 1) / 2;
            if !self.precedes(self.heap[at], self.heap[parent]) {
                break;
            }
            self.swap(at, parent);
            at = parent;
        }
    }

    fn sift_down(&mut self, mut at: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * at + 1;
            let right = left + 1;
            let mut smallest = at;
            if left < n && self.precedes(self.heap[left], self.heap[smallest]) {
                smallest = left;
            }
            if right < n && self.precedes(self.heap[right], self.heap[smallest]) {
                smallest = right;
            }
            if smallest == at {
                break;
            }
            self.swap(at, smallest);
            at = smallest;
        }
    }
}


#[cfg(test)]
#[path = "tests_heap_contract.rs"]
mod tests_heap_contract;
