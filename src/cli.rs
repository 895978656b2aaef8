// cli.rs
//
// Command-line parsing: the `-L<n>,<A>,<B>,<C>,<T>,<flags>` / `-I...` /
// `-D...` / `-T,<T>` grammar from the original cachesim, reproduced with
// a hand-written tokenizer instead of a `clap` derive. `clap`'s derive
// macro has no native support for a positional tuple glued onto a
// single-letter flag (`-L1,2,4,16,1,1` is one argv token, not a flag plus
// a value), so this module scans the raw argument strings the way the
// original's `parse_args`/`make_cache`/`removegaps` do — it just returns
// a `Result` instead of calling `failure()` and `exit`.

use std::path::PathBuf;

use crate::cache::config::CacheGeometry;
use crate::errors::CacheSimError;
use crate::utils::logger::LogLevel;

/// `n` ranges over `{1, 2}` — the grammar has no way to express a third
/// level, matching the original's `#define MAXLEVEL 2`.
pub const MAX_LEVEL: u32 = 2;

pub const USAGE: &str = "\
cachesim: a multi-level CPU cache hierarchy simulator
usage: cachesim [options] [input_file]

OPTIONS
  -L<n>,<cachespec>   specify unified L<n> cache
  -I<n>,<cachespec>   specify split L<n> instruction cache
  -D<n>,<cachespec>   specify split L<n> data cache
  -T,<T>              specify DRAM access time = <T>
  --seed <n>          seed the replacement-policy RNG (affects RND only)
  --log-level <lvl>   run-log verbosity: error, warn, info, debug (default info)
  --log-file <path>   write the run log here instead of stdout
  -help, --help       show this help and exit

<cachespec>: <A>,<B>,<C>,<T>,<flags>
  A: associativity
  B: block size (bytes)
  C: capacity (bytes)
  T: hit time
  flags: octal, sum of
    01   write-allocate ON (00 = OFF)
    00   replacement LRU
    10   replacement RND
    20   replacement FIFO

input_file: trace of `<mode> <hex_addr>` records, mode in {0=read, 1=write,
2=instruction fetch}. `-` or omitted reads from standard input.
";

/// Either the caller asked for help, or parsing produced a validated
/// configuration ready to build a `Hierarchy` from.
pub enum Action {
    Help,
    Run(Config),
}

pub struct Config {
    pub levels: Vec<LevelSpec>,
    pub dram_access_time: u32,
    pub trace_path: Option<PathBuf>,
    pub seed: Option<u64>,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

/// `error` / `warn` / `info` / `debug`, case-insensitive; anything else
/// falls back to `info` rather than rejecting the run.
fn parse_log_level(s: &str) -> LogLevel {
    match s.to_lowercase().as_str() {
        "error" => LogLevel::Error,
        "warn" | "warning" => LogLevel::Warning,
        "debug" => LogLevel::Debug,
        _ => LogLevel::Info,
    }
}

/// One fully-resolved level: `unified` records whether `-L` (one cache,
/// shared by both sides) or `-I`/`-D` (two independent caches) produced
/// it, which `Hierarchy::from_config` needs to decide whether to build a
/// `LevelCache::Unified` or a `LevelCache::Split`.
pub struct LevelSpec {
    pub n: u32,
    pub unified: bool,
    pub inst: CacheGeometry,
    pub data: CacheGeometry,
}

#[derive(Default, Clone, Copy)]
struct RawGeometry {
    assoc: u32,
    block_size: u32,
    capacity: u32,
    hit_time: u32,
    flags: u32,
}

#[derive(Default)]
struct LevelSlot {
    unified: Option<RawGeometry>,
    inst: Option<RawGeometry>,
    data: Option<RawGeometry>,
}

pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Action, CacheSimError> {
    let mut slots: Vec<LevelSlot> = (0..MAX_LEVEL).map(|_| LevelSlot::default()).collect();
    let mut dram_access_time = 0u32;
    let mut trace_path: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;
    let mut log_level = LogLevel::Info;
    let mut log_file: Option<PathBuf> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        if arg == "-help" || arg == "--help" {
            return Ok(Action::Help);
        }
        if arg == "--seed" {
            let value = iter
                .next()
                .ok_or_else(|| CacheSimError::config("--seed requires a value"))?;
            seed = Some(
                value
                    .parse()
                    .map_err(|_| CacheSimError::config(format!("invalid --seed value {:?}", value)))?,
            );
            continue;
        }
        if arg == "--log-level" {
            let value = iter
                .next()
                .ok_or_else(|| CacheSimError::config("--log-level requires a value"))?;
            log_level = parse_log_level(&value);
            continue;
        }
        if arg == "--log-file" {
            let value = iter
                .next()
                .ok_or_else(|| CacheSimError::config("--log-file requires a value"))?;
            log_file = Some(PathBuf::from(value));
            continue;
        }
        if let Some(rest) = arg.strip_prefix("-T,") {
            dram_access_time = rest
                .parse()
                .map_err(|_| CacheSimError::config(format!("invalid DRAM access time {:?}", rest)))?;
            continue;
        }
        if arg == "-" {
            trace_path = None;
            continue;
        }
        if let Some(rest) = arg.strip_prefix('-') {
            let kind = rest
                .chars()
                .next()
                .ok_or_else(|| CacheSimError::config(format!("unknown option {:?}", arg)))?;
            if matches!(kind, 'L' | 'I' | 'D') {
                let token = parse_cache_token(&rest[1..])
                    .ok_or_else(|| CacheSimError::config(format!("malformed cache spec {:?}", arg)))?;
                assign_level(&mut slots, kind, token)?;
                continue;
            }
            return Err(CacheSimError::config(format!("unknown option {:?}", arg)));
        }
        trace_path = Some(PathBuf::from(arg));
    }

    let levels = finalize_levels(slots)?;
    Ok(Action::Run(Config {
        levels,
        dram_access_time,
        trace_path,
        seed,
        log_level,
        log_file,
    }))
}

struct CacheToken {
    n: u32,
    geometry: RawGeometry,
}

/// Parses the `n,A,B,C,T,flags` tail of a `-L`/`-I`/`-D` token. `flags`
/// is octal, matching the original's `sscanf(..., "%o")`.
fn parse_cache_token(s: &str) -> Option<CacheToken> {
    let fields: Vec<&str> = s.split(',').collect();
    let [n, assoc, block_size, capacity, hit_time, flags] = fields[..] else {
        return None;
    };
    Some(CacheToken {
        n: n.parse().ok()?,
        geometry: RawGeometry {
            assoc: assoc.parse().ok()?,
            block_size: block_size.parse().ok()?,
            capacity: capacity.parse().ok()?,
            hit_time: hit_time.parse().ok()?,
            flags: u32::from_str_radix(flags, 8).ok()?,
        },
    })
}

fn assign_level(slots: &mut [LevelSlot], kind: char, token: CacheToken) -> Result<(), CacheSimError> {
    if token.n == 0 || token.n > MAX_LEVEL {
        return Err(CacheSimError::config(format!("I cannot simulate L{} cache!", token.n)));
    }
    let slot = &mut slots[(token.n - 1) as usize];
    match kind {
        'L' => {
            if slot.unified.is_some() || slot.inst.is_some() || slot.data.is_some() {
                return Err(CacheSimError::config(format!(
                    "you cannot specify L{} cache twice!",
                    token.n
                )));
            }
            slot.unified = Some(token.geometry);
        },
        'I' => {
            if slot.unified.is_some() || slot.inst.is_some() {
                return Err(CacheSimError::config(format!(
                    "you cannot specify L{} instruction cache twice!",
                    token.n
                )));
            }
            slot.inst = Some(token.geometry);
        },
        'D' => {
            if slot.unified.is_some() || slot.data.is_some() {
                return Err(CacheSimError::config(format!(
                    "you cannot specify L{} data cache twice!",
                    token.n
                )));
            }
            slot.data = Some(token.geometry);
        },
        _ => unreachable!("caller only dispatches L/I/D"),
    }
    Ok(())
}

/// Strips trailing unconfigured slots, then requires every remaining
/// level from 1 up to the highest one mentioned to be fully specified
/// (either unified, or both instruction and data sides) — a gap, or a
/// level with only one split half, is rejected rather than silently
/// renumbered.
fn finalize_levels(slots: Vec<LevelSlot>) -> Result<Vec<LevelSpec>, CacheSimError> {
    let Some(highest) = slots
        .iter()
        .rposition(|s| s.unified.is_some() || s.inst.is_some() || s.data.is_some())
    else {
        return Ok(Vec::new());
    };

    let mut levels = Vec::with_capacity(highest + 1);
    for (i, slot) in slots.into_iter().enumerate().take(highest + 1) {
        let n = (i + 1) as u32;
        let spec = match (slot.unified, slot.inst, slot.data) {
            (Some(g), None, None) => LevelSpec {
                n,
                unified: true,
                inst: build_geometry(g)?,
                data: build_geometry(g)?,
            },
            (None, Some(i_geom), Some(d_geom)) => LevelSpec {
                n,
                unified: false,
                inst: build_geometry(i_geom)?,
                data: build_geometry(d_geom)?,
            },
            (None, Some(_), None) => {
                return Err(CacheSimError::config(format!("you did not specify L{} data cache!", n)))
            },
            (None, None, Some(_)) => {
                return Err(CacheSimError::config(format!(
                    "you did not specify L{} instruction cache!",
                    n
                )))
            },
            (None, None, None) => {
                return Err(CacheSimError::config(format!("you did not specify L{} cache!", n)))
            },
            (Some(_), Some(_) | None, Some(_)) | (Some(_), Some(_), None) => {
                unreachable!("assign_level rejects unified+split combinations")
            },
        };
        levels.push(spec);
    }
    Ok(levels)
}

fn build_geometry(raw: RawGeometry) -> Result<CacheGeometry, CacheSimError> {
    CacheGeometry::new(raw.assoc, raw.block_size, raw.capacity, raw.hit_time, raw.flags)
}
