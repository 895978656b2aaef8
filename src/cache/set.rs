// set.rs
//
// One associativity-wide set: its lines, its recency/insertion order list,
// and its tag hash. `Cache::access` (level.rs) orchestrates these three
// pieces; `CacheSet` just exposes the primitive operations on them.

use rand::Rng;

use super::config::ReplacementPolicy;
use super::hash::SetHash;
use super::line::CacheLine;
use super::order::OrderList;

pub struct CacheSet {
    pub lines: Vec<CacheLine>,
    order: OrderList,
    hash: SetHash,
}

impl CacheSet {
    pub fn new(assoc: usize, hash_slots: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); assoc],
            order: OrderList::new(assoc),
            hash: SetHash::new(hash_slots),
        }
    }

    pub fn find_tag(&self, tag: u32) -> Option<usize> {
        self.hash.find_line(tag, &self.lines)
    }

    /// Select a replacement victim without mutating any state.
    pub fn victim(&self, policy: ReplacementPolicy, rng: &mut impl Rng) -> usize {
        let tail = self.order.tail();
        match policy {
            ReplacementPolicy::Lru | ReplacementPolicy::Fifo => tail,
            ReplacementPolicy::Rnd => {
                if !self.lines[tail].valid {
                    tail
                } else {
                    rng.gen_range(0..self.lines.len())
                }
            },
        }
    }

    pub fn remove_from_hash(&mut self, line_idx: usize) {
        let tag = self.lines[line_idx].tag;
        self.hash.remove(tag, &self.lines);
    }

    pub fn insert_into_hash(&mut self, line_idx: usize) {
        let tag = self.lines[line_idx].tag;
        self.hash.insert(tag, line_idx, &self.lines);
    }

    /// Order-list update after a hit (`fresh = false`) or a fresh
    /// allocation (`fresh = true`): LRU always promotes to MRU; FIFO/RND
    /// promote only on fresh insertion, leaving a hit's order untouched.
    pub fn touch(&mut self, line_idx: usize, fresh: bool, policy: ReplacementPolicy) {
        match policy {
            ReplacementPolicy::Lru => self.order.move_to_front(line_idx),
            ReplacementPolicy::Fifo | ReplacementPolicy::Rnd => {
                if fresh {
                    self.order.move_to_front(line_idx);
                }
            },
        }
    }

    #[cfg(test)]
    pub fn order_iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter()
    }
}
