// level.rs
//
// The cache-level access engine: a fixed array of sets, each owning its
// own order list and hash table. `access` implements the full
// lookup/allocate/writeback-detection/order-update algorithm; `flush`
// walks every line and reports dirty blocks for writeback. Inter-level
// recursion (refill, writeback propagation, block-size expansion) lives
// one layer up, in the hierarchy driver — a cache level never knows about
// its neighbors.

use rand::rngs::StdRng;

use super::config::CacheGeometry;
use super::set::CacheSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    MissNoKick,
    /// Carries the block base address of the dirty line that was evicted.
    MissKick(u32),
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AccessOutcome::Hit)
    }
}

pub struct Cache {
    pub geometry: CacheGeometry,
    pub sets: Vec<CacheSet>,
    rng: StdRng,
}

impl Cache {
    pub fn new(geometry: CacheGeometry, rng: StdRng) -> Self {
        let hash_slots = geometry.hash_slots();
        let sets = (0..geometry.nsets)
            .map(|_| CacheSet::new(geometry.assoc as usize, hash_slots))
            .collect();
        Self {
            geometry,
            sets,
            rng,
        }
    }

    /// `access(addr, writing)`: look up the block, and on a miss decide
    /// whether to allocate (write-allocate policy for writes; always for
    /// reads), evict a victim, and report whether that victim needs a
    /// writeback.
    pub fn access(&mut self, addr: u32, writing: bool) -> AccessOutcome {
        let Self {
            geometry,
            sets,
            rng,
        } = self;
        let (tag, index) = decode(geometry, addr);
        let set = &mut sets[index];

        if let Some(line_idx) = set.find_tag(tag) {
            log::trace!("tag {:#x} found in set {}, line {}", tag, index, line_idx);
            if writing {
                set.lines[line_idx].dirty = true;
            }
            set.touch(line_idx, false, geometry.policy);
            return AccessOutcome::Hit;
        }

        log::trace!("tag {:#x} not found in set {}", tag, index);
        let allocate = !writing || geometry.write_allocate;
        if !allocate {
            log::trace!("write {:#x} bypasses cache, goes to next level", addr);
            return AccessOutcome::MissNoKick;
        }

        let victim_idx = set.victim(geometry.policy, rng);
        let victim_valid = set.lines[victim_idx].valid;
        let victim_dirty = set.lines[victim_idx].dirty;
        let victim_tag = set.lines[victim_idx].tag;

        let outcome = if victim_valid && victim_dirty {
            let base = block_base(geometry, victim_tag, index);
            log::trace!("victim line {} is dirty, kicking out {:#x}", victim_idx, base);
            AccessOutcome::MissKick(base)
        } else {
            AccessOutcome::MissNoKick
        };

        if victim_valid {
            set.remove_from_hash(victim_idx);
        }
        set.lines[victim_idx].tag = tag;
        set.lines[victim_idx].valid = true;
        set.lines[victim_idx].dirty = writing;
        set.insert_into_hash(victim_idx);
        set.touch(victim_idx, true, geometry.policy);

        outcome
    }

    /// Walk every line; for each dirty valid line hand its block base to
    /// `writeback` and clear the dirty bit. Running this twice in a row
    /// is a no-op the second time, since nothing is left dirty.
    pub fn flush(&mut self, mut writeback: impl FnMut(u32)) {
        let geometry = &self.geometry;
        for (index, set) in self.sets.iter_mut().enumerate() {
            for line in set.lines.iter_mut() {
                if line.valid && line.dirty {
                    writeback(block_base(geometry, line.tag, index));
                    line.dirty = false;
                }
            }
        }
    }
}

/// Split address `a` into `(tag, set index)` given a cache's geometry.
fn decode(geometry: &CacheGeometry, addr: u32) -> (u32, usize) {
    let index = (addr >> geometry.off_bits) & (geometry.nsets - 1);
    let tag = addr >> (geometry.off_bits + geometry.idx_bits);
    (tag, index as usize)
}

/// Inverse of `decode`: the block base address covered by a line holding
/// tag `tag` in set `index`.
fn block_base(geometry: &CacheGeometry, tag: u32, index: usize) -> u32 {
    ((tag << geometry.idx_bits) | index as u32) << geometry.off_bits
}
