// hash.rs
//
// Per-set tag -> line lookup: open addressing, linear probing with
// wraparound, `2 * associativity` slots so the load factor stays strictly
// below 1. Deletion repairs the probe-sequence invariant ("no hole before
// an element that still needs to reach its natural bucket through the
// hole") by the same robin-hood backfill as the original's `hash_del`.

use super::line::CacheLine;

pub struct SetHash {
    slots: Vec<Option<usize>>,
}

impl SetHash {
    pub fn new(num_slots: usize) -> Self {
        debug_assert!(num_slots.is_power_of_two());
        Self {
            slots: vec![None; num_slots],
        }
    }

    fn size(&self) -> usize {
        self.slots.len()
    }

    fn bucket(&self, tag: u32) -> usize {
        (tag as usize) & (self.size() - 1)
    }

    /// Returns the slot holding `tag`, or the first empty slot along the
    /// probe sequence where `tag` belongs if it is not present.
    fn find(&self, tag: u32, lines: &[CacheLine]) -> usize {
        let size = self.size();
        let mut slot = self.bucket(tag);
        loop {
            match self.slots[slot] {
                None => return slot,
                Some(line_idx) => {
                    debug_assert!(lines[line_idx].valid);
                    if lines[line_idx].tag == tag {
                        return slot;
                    }
                },
            }
            slot = (slot + 1) % size;
        }
    }

    pub fn find_line(&self, tag: u32, lines: &[CacheLine]) -> Option<usize> {
        match self.slots[self.find(tag, lines)] {
            Some(idx) if lines[idx].valid && lines[idx].tag == tag => Some(idx),
            _ => None,
        }
    }

    /// Precondition: `tag` is not already present and the table has room.
    pub fn insert(&mut self, tag: u32, line_idx: usize, lines: &[CacheLine]) {
        let slot = self.find(tag, lines);
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(line_idx);
    }

    /// Remove the line holding `tag`, then backfill the hole so every
    /// element still reachable from its natural bucket.
    pub fn remove(&mut self, tag: u32, lines: &[CacheLine]) {
        let size = self.size();
        let mut hole = self.find(tag, lines);
        debug_assert!(matches!(self.slots[hole], Some(idx) if lines[idx].tag == tag));
        self.slots[hole] = None;

        let mut j = hole;
        loop {
            j = (j + 1) % size;
            let Some(line_idx) = self.slots[j] else {
                break;
            };
            let natural = self.bucket(lines[line_idx].tag);
            if Self::should_move(hole, j, natural) {
                self.slots[hole] = self.slots[j];
                self.slots[j] = None;
                hole = j;
            }
        }
    }

    /// Move the occupant of `j` into hole `i` exactly when its natural
    /// bucket `k` no longer reaches it without crossing the hole, i.e.
    /// `k` lies in the cyclic arc `(i, j]`. Equivalently: the distance
    /// from `k` to `i` (mod size) is strictly less than the distance
    /// from `k` to `j` (mod size).
    fn should_move(i: usize, j: usize, k: usize) -> bool {
        (i < j) as u8 + (j < k) as u8 + (k <= i) as u8 == 2
    }
}
