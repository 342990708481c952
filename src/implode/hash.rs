//! Hash chains for repetition search
//!
//! Every encoded position is indexed by the hash of the byte pair starting
//! there. `head` holds the most recent position for each hash and `prev`
//! links each position to the previous one with the same hash, so a chain
//! walk visits candidates nearest first.

use super::{byte_pair_hash, HASH_TABLE_SIZE};
use crate::window::SlidingWindow;

/// Size of the `prev` ring; must exceed the largest dictionary
const PREV_SIZE: usize = 0x2000;
const PREV_MASK: usize = PREV_SIZE - 1;

/// Byte-pair hash chains over absolute window positions
#[derive(Debug)]
pub struct MatchFinder {
    head: Vec<Option<usize>>,
    prev: Vec<Option<usize>>,
}

impl Default for MatchFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchFinder {
    /// Create empty chains
    pub fn new() -> Self {
        Self {
            head: vec![None; HASH_TABLE_SIZE],
            prev: vec![None; PREV_SIZE],
        }
    }

    /// Index the byte pair at `pos`; both bytes must be in the window
    pub fn insert(&mut self, window: &SlidingWindow, pos: usize) {
        let hash = byte_pair_hash(&[window.byte(pos), window.byte(pos + 1)]);
        self.prev[pos & PREV_MASK] = self.head[hash];
        self.head[hash] = Some(pos);
    }

    /// Earlier positions whose byte pair hashes like the one at `pos`,
    /// nearest first
    ///
    /// Links older than the ring size are stale; callers must stop walking
    /// once a candidate is out of dictionary reach.
    pub fn candidates<'a>(
        &'a self,
        window: &SlidingWindow,
        pos: usize,
    ) -> impl Iterator<Item = usize> + 'a {
        let hash = byte_pair_hash(&[window.byte(pos), window.byte(pos + 1)]);
        std::iter::successors(self.head[hash], move |&candidate| {
            self.prev[candidate & PREV_MASK]
        })
        .filter(move |&candidate| candidate < pos)
    }
}
