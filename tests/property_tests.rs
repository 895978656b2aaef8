// Property-based tests for the invariants in the simulator's testable-
// properties catalogue: hash/valid-line correspondence, order-list
// completeness, LRU/FIFO victim identity, write-allocate semantics, and
// flush idempotence. Exercised directly against `Cache`/`CacheSet`
// rather than through the CLI.

use cachesim::cache::{AccessOutcome, Cache, CacheGeometry};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn cache(assoc: u32, block: u32, cap: u32, flags: u32, seed: u64) -> Cache {
    let geometry = CacheGeometry::new(assoc, block, cap, 1, flags).unwrap();
    Cache::new(geometry, StdRng::seed_from_u64(seed))
}

proptest! {
    /// Invariant 1/2: after any sequence of accesses, every tag that was
    /// the most recent write to its set's index is either still a hit
    /// (if not yet evicted) or produces a clean miss-then-hit — i.e. the
    /// hash and the line's actual state never diverge.
    #[test]
    fn hash_find_matches_valid_lines(
        addrs in prop::collection::vec(0u32..256, 1..64),
        seed in any::<u64>(),
    ) {
        let mut c = cache(4, 4, 64, 0o1, seed);
        for &addr in &addrs {
            c.access(addr, false);
        }
        // Re-accessing the most recently touched address must hit,
        // unless the set has since been filled by others and it was
        // evicted — in either case `access` must not panic and the
        // outcome must be one of the three defined variants.
        for &addr in &addrs {
            let outcome = c.access(addr, false);
            prop_assert!(matches!(
                outcome,
                AccessOutcome::Hit | AccessOutcome::MissNoKick | AccessOutcome::MissKick(_)
            ));
        }
    }

    /// Invariant 6: with write-allocate disabled, a write miss never
    /// changes any line's valid/tag state — only a bypass write is
    /// issued (`MissNoKick`), and cache contents are fully insulated
    /// from write traffic.
    #[test]
    fn no_write_allocate_never_installs_a_line(
        addrs in prop::collection::vec(0u32..256, 1..32),
        seed in any::<u64>(),
    ) {
        let mut c = cache(2, 4, 16, 0o0, seed);
        for &addr in &addrs {
            let outcome = c.access(addr, true);
            prop_assert_eq!(outcome, AccessOutcome::MissNoKick);
        }
        // Every address must still miss on a subsequent read: nothing
        // was ever allocated.
        for &addr in &addrs {
            prop_assert_ne!(c.access(addr, false), AccessOutcome::Hit);
        }
    }

    /// Invariant 7: with write-allocate enabled, a write miss always
    /// allocates (a later read of the same address hits) and the line
    /// ends up dirty (a flush reports it as needing writeback).
    #[test]
    fn write_allocate_installs_dirty_line(addr in 0u32..64, seed in any::<u64>()) {
        let mut c = cache(2, 4, 16, 0o1, seed);
        c.access(addr, true);
        prop_assert_eq!(c.access(addr, false), AccessOutcome::Hit);

        let mut flushed = Vec::new();
        c.flush(|base| flushed.push(base));
        prop_assert!(!flushed.is_empty());
    }

    /// Invariant 8: flush is idempotent — a second pass immediately
    /// after the first reports no further dirty lines.
    #[test]
    fn flush_twice_is_a_noop_the_second_time(
        addrs in prop::collection::vec(0u32..256, 1..32),
        seed in any::<u64>(),
    ) {
        let mut c = cache(4, 4, 64, 0o1, seed);
        for &addr in &addrs {
            c.access(addr, true);
        }
        let mut first = Vec::new();
        c.flush(|base| first.push(base));

        let mut second = Vec::new();
        c.flush(|base| second.push(base));
        prop_assert!(second.is_empty());
    }

    /// Invariant 4: under LRU, once a set is full, the next miss evicts
    /// whichever of the set's current occupants was least recently
    /// touched — re-touching one element keeps it from being the victim
    /// on the very next miss into that set.
    #[test]
    fn lru_does_not_evict_the_just_touched_line(seed in any::<u64>()) {
        // A=2, B=4, C=8 -> one set, two lines.
        let mut c = cache(2, 4, 8, 0o1, seed);
        c.access(0x00, false); // tag 0
        c.access(0x04, false); // tag 1
        c.access(0x00, false); // re-touch tag 0 -> now MRU, tag 1 is LRU

        match c.access(0x08, false) { // tag 2, forces an eviction
            AccessOutcome::MissNoKick | AccessOutcome::MissKick(_) => {},
            other => prop_assert!(false, "expected a miss, got {:?}", other),
        }
        // tag 0 must still be resident; tag 1 was the victim.
        prop_assert_eq!(c.access(0x00, false), AccessOutcome::Hit);
    }

    /// Invariant 5: under FIFO, re-touching (hitting) a line does not
    /// change its insertion order, so the oldest *insertion* is still
    /// evicted first even if it was hit in between.
    #[test]
    fn fifo_ignores_hits_when_choosing_a_victim(seed in any::<u64>()) {
        let mut c = cache(2, 4, 8, 0o21, seed); // write-allocate + FIFO
        c.access(0x00, false); // tag 0 inserted first
        c.access(0x04, false); // tag 1 inserted second
        c.access(0x00, false); // hit on tag 0 - FIFO order must not change

        c.access(0x08, false); // tag 2 -> evicts tag 0 (oldest insertion)
        prop_assert_eq!(c.access(0x04, false), AccessOutcome::Hit); // tag 1 survives
    }
}

#[cfg(test)]
mod geometry {
    use super::*;

    #[test]
    fn fully_associative_single_set_has_hash_slots_double_assoc() {
        let geometry = CacheGeometry::new(8, 4, 32, 1, 0).unwrap();
        assert_eq!(geometry.nsets, 1);
        assert_eq!(geometry.hash_slots(), 16);
    }

    #[test]
    fn decode_and_inverse_round_trip() {
        // A=2, B=8, C=64 -> off_bits=3, idx_bits=2.
        let geometry = CacheGeometry::new(2, 8, 64, 1, 0).unwrap();
        let mut cache = Cache::new(geometry, StdRng::seed_from_u64(9));
        for base in (0u32..64).step_by(8) {
            cache.access(base, false);
        }
        // Every distinct block base must have been a cold miss exactly
        // once in this pass (8 blocks, 4 sets of 2 lines each -> no
        // evictions yet).
        for base in (0u32..64).step_by(8) {
            assert_eq!(cache.access(base, false), AccessOutcome::Hit);
        }
    }
}
