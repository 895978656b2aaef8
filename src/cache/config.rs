// config.rs
//
// Geometry and policy for a single cache object, derived from the four
// dimensions (associativity, block size, capacity, hit time) and the octal
// `flags` word of the simulator's CLI grammar. Validation happens once,
// at construction, exactly as the functional address-decode math assumes.

use crate::errors::CacheSimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    Lru,
    Fifo,
    Rnd,
}

impl ReplacementPolicy {
    /// Decode bits `0o70` of the flags word: `0o00` LRU, `0o10` RND, `0o20` FIFO.
    pub fn from_flags(flags: u32) -> Result<Self, CacheSimError> {
        match flags & 0o70 {
            0o00 => Ok(ReplacementPolicy::Lru),
            0o10 => Ok(ReplacementPolicy::Rnd),
            0o20 => Ok(ReplacementPolicy::Fifo),
            other => Err(CacheSimError::config(format!(
                "unknown replacement policy bits 0o{:o}",
                other
            ))),
        }
    }
}

fn log2_exact(n: u32, what: &str) -> Result<u32, CacheSimError> {
    if n == 0 || (n & (n - 1)) != 0 {
        return Err(CacheSimError::config(format!(
            "{} ({}) is not a power of two",
            what, n
        )));
    }
    Ok(n.trailing_zeros())
}

/// Geometry and write policy for one cache (one side of one level).
#[derive(Debug, Clone, Copy)]
pub struct CacheGeometry {
    pub assoc: u32,
    pub block_size: u32,
    pub capacity: u32,
    pub hit_time: u32,
    pub write_allocate: bool,
    pub policy: ReplacementPolicy,
    pub off_bits: u32,
    pub idx_bits: u32,
    pub nsets: u32,
    pub nlines: u32,
}

impl CacheGeometry {
    pub fn new(
        assoc: u32,
        block_size: u32,
        capacity: u32,
        hit_time: u32,
        flags: u32,
    ) -> Result<Self, CacheSimError> {
        let off_bits = log2_exact(block_size, "block size")?;
        let log_a = log2_exact(assoc, "associativity")?;
        let log_c = log2_exact(capacity, "capacity")?;
        if log_c < log_a + off_bits {
            return Err(CacheSimError::config(
                "capacity cannot be smaller than set size (A * B)",
            ));
        }
        let idx_bits = log_c - log_a - off_bits;
        let nsets = 1u32 << idx_bits;
        let nlines = 1u32 << (log_c - off_bits);
        let write_allocate = flags & 0o1 != 0;
        let policy = ReplacementPolicy::from_flags(flags)?;

        Ok(Self {
            assoc,
            block_size,
            capacity,
            hit_time,
            write_allocate,
            policy,
            off_bits,
            idx_bits,
            nsets,
            nlines,
        })
    }

    /// Hash-table slots per set: `2^(log2(assoc)+1)`, i.e. `2 * assoc`.
    pub fn hash_slots(&self) -> usize {
        (self.assoc as usize) * 2
    }
}
