// hierarchy.rs
//
// The ordered sequence of cache levels, each optionally split into
// instruction/data sides, followed by an implicit DRAM sentinel. Routes
// accesses, handles write-allocate refill/writeback propagation, and
// expands a block across the next level's block size when the two
// differ. The DRAM sentinel is not a struct of its own — it's simply
// "one past the last level" — so the recursion base case is a single
// bounds check rather than a null-cache special case.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cache::{AccessOutcome, Cache};
use crate::cli::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DataRead,
    DataWrite,
    InstFetch,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::DataRead, Mode::DataWrite, Mode::InstFetch];

    pub fn index(self) -> usize {
        match self {
            Mode::DataRead => 0,
            Mode::DataWrite => 1,
            Mode::InstFetch => 2,
        }
    }

    fn is_write(self) -> bool {
        matches!(self, Mode::DataWrite)
    }

    /// The mode a miss refill issues against the next level: instruction
    /// fetches stay instruction fetches, reads and writes both refill as
    /// reads.
    fn refill_mode(self) -> Mode {
        if self == Mode::InstFetch {
            Mode::InstFetch
        } else {
            Mode::DataRead
        }
    }
}

/// One level's cache(s): a single shared object if unified, or two
/// independent objects if split. Modeling this as an enum (rather than a
/// shared reference to one object) keeps a unified level's I and D
/// routing provably the *same* cache state without reference counting.
pub enum LevelCache {
    Unified(Cache),
    Split { inst: Cache, data: Cache },
}

impl LevelCache {
    fn inst_mut(&mut self) -> &mut Cache {
        match self {
            LevelCache::Unified(c) => c,
            LevelCache::Split { inst, .. } => inst,
        }
    }

    fn data_mut(&mut self) -> &mut Cache {
        match self {
            LevelCache::Unified(c) => c,
            LevelCache::Split { data, .. } => data,
        }
    }

    fn side_mut(&mut self, mode: Mode) -> &mut Cache {
        if mode == Mode::InstFetch {
            self.inst_mut()
        } else {
            self.data_mut()
        }
    }

    pub fn is_unified(&self) -> bool {
        matches!(self, LevelCache::Unified(_))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LevelCounters {
    pub fetchcount: [u64; 3],
    pub misscount: [u64; 3],
}

pub struct HierarchyLevel {
    pub n: u32,
    pub cache: LevelCache,
    pub counters: LevelCounters,
}

/// The full hierarchy: levels `L[0]..L[k]` in order, followed by the
/// implicit DRAM sentinel. `pair_access`/`pair_access_block` mirror the
/// source's recursive routing exactly; `flush` walks the levels in order
/// issuing one writeback per dirty line found.
pub struct Hierarchy {
    pub levels: Vec<HierarchyLevel>,
    pub dram_access_time: u32,
    pub dram_fetchcount: [u64; 3],
}

impl Hierarchy {
    pub fn new(levels: Vec<HierarchyLevel>, dram_access_time: u32) -> Self {
        Self {
            levels,
            dram_access_time,
            dram_fetchcount: [0; 3],
        }
    }

    /// Builds a hierarchy from a validated CLI configuration. A single
    /// `StdRng` is seeded once (from the `--seed` flag, or from entropy
    /// if unset) and used to derive one seed per constructed cache, so a
    /// fixed `--seed` reproduces the whole hierarchy's RND replacement
    /// decisions run to run, matching §5's determinism requirement.
    pub fn from_config(config: &Config) -> Self {
        let mut seeder = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let levels = config
            .levels
            .iter()
            .map(|spec| {
                let cache = if spec.unified {
                    LevelCache::Unified(Cache::new(spec.inst, StdRng::seed_from_u64(seeder.gen())))
                } else {
                    LevelCache::Split {
                        inst: Cache::new(spec.inst, StdRng::seed_from_u64(seeder.gen())),
                        data: Cache::new(spec.data, StdRng::seed_from_u64(seeder.gen())),
                    }
                };
                HierarchyLevel {
                    n: spec.n,
                    cache,
                    counters: LevelCounters::default(),
                }
            })
            .collect();
        Self::new(levels, config.dram_access_time)
    }

    /// Route one access at `level_idx`. `level_idx == levels.len()` is the
    /// DRAM sentinel: it only counts the fetch and returns.
    pub fn pair_access(&mut self, level_idx: usize, addr: u32, mode: Mode) {
        if level_idx == self.levels.len() {
            self.dram_fetchcount[mode.index()] += 1;
            return;
        }

        self.levels[level_idx].counters.fetchcount[mode.index()] += 1;
        let cache = self.levels[level_idx].cache.side_mut(mode);
        let block_size = cache.geometry.block_size;
        let outcome = cache.access(addr, mode.is_write());

        if outcome.is_hit() {
            return;
        }

        self.levels[level_idx].counters.misscount[mode.index()] += 1;
        let block_start = addr & !(block_size - 1);
        let block_end = block_start + block_size;
        self.pair_access_block(level_idx + 1, block_start, block_end, mode.refill_mode());

        if let AccessOutcome::MissKick(kicked) = outcome {
            self.pair_access_block(level_idx + 1, kicked, kicked + block_size, Mode::DataWrite);
        }
    }

    /// Issue one `pair_access` per block at the *next* level's block
    /// size, walking `[start, end)`. At the DRAM sentinel the whole span
    /// is one access (DRAM has no block size of its own).
    pub fn pair_access_block(&mut self, level_idx: usize, start: u32, end: u32, mode: Mode) {
        let next_block_size = if level_idx == self.levels.len() {
            end - start
        } else {
            self.levels[level_idx].cache.peek_block_size(mode)
        };

        let mut addr = start;
        while addr < end {
            self.pair_access(level_idx, addr, mode);
            addr += next_block_size;
        }
    }

    /// Flush every level in order: instruction side first, then the data
    /// side if the level is split. Each dirty line becomes a `DataWrite`
    /// against the next level, which may itself recurse.
    pub fn flush(&mut self) {
        for i in 0..self.levels.len() {
            let unified = self.levels[i].cache.is_unified();
            self.flush_side(i, true);
            if !unified {
                self.flush_side(i, false);
            }
        }
    }

    fn flush_side(&mut self, level_idx: usize, inst_side: bool) {
        let (block_size, dirty_bases) = {
            let cache = if inst_side {
                self.levels[level_idx].cache.inst_mut()
            } else {
                self.levels[level_idx].cache.data_mut()
            };
            let block_size = cache.geometry.block_size;
            let mut bases = Vec::new();
            cache.flush(|base| bases.push(base));
            (block_size, bases)
        };
        for base in dirty_bases {
            self.pair_access_block(level_idx + 1, base, base + block_size, Mode::DataWrite);
        }
    }
}

impl LevelCache {
    fn peek_block_size(&self, mode: Mode) -> u32 {
        match self {
            LevelCache::Unified(c) => c.geometry.block_size,
            LevelCache::Split { inst, data } => {
                if mode == Mode::InstFetch {
                    inst.geometry.block_size
                } else {
                    data.geometry.block_size
                }
            },
        }
    }

    /// The hit time to charge for `mode` at this level, used by
    /// `stats::report` to weight each level's instruction/data fetch
    /// counts. Unified levels report the same value for both.
    pub fn hit_time_for(&self, mode: Mode) -> u32 {
        match self {
            LevelCache::Unified(c) => c.geometry.hit_time,
            LevelCache::Split { inst, data } => {
                if mode == Mode::InstFetch {
                    inst.geometry.hit_time
                } else {
                    data.geometry.hit_time
                }
            },
        }
    }
}
