// stats.rs
//
// Per-level (and DRAM) statistics reporting: the five-category
// `{Total, Instruction, Data, Read, Write}` breakdown of fetches and miss
// rates, plus weighted access time. Column layout matches the original
// simulator's fixed-width `STAT_HEADER`/`print_count`/`print_fraction`.

use std::fmt::Write as _;

use crate::hierarchy::Hierarchy;

const HEADER: &str = "Metrics     Total       Instruction Data        Read        Write\n\
----------- ----------- ----------- ----------- ----------- -----------\n";

/// Expand the three trace-native counters (DataRead, DataWrite, InstFetch)
/// into the five report categories. `Total = Read + Write + Instruction`
/// (not `+ Data`, since `Data = Read + Write`).
fn full_count(counts: [u64; 3]) -> [u64; 5] {
    let read = counts[0];
    let write = counts[1];
    let inst = counts[2];
    let data = read + write;
    [data + inst, inst, data, read, write]
}

fn print_count(out: &mut String, title: &str, values: [u64; 5]) {
    let _ = write!(
        out,
        "{:<11} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
        title, values[0], values[1], values[2], values[3], values[4]
    );
}

/// `against_total = true` computes each category's share of its own
/// total column (`fetches / fetches` → "fraction of accesses", all
/// divided by `denominator[0]`). `against_total = false` divides
/// category-wise (`misses[i] / fetches[i]` → miss rate per category).
fn print_fraction(
    out: &mut String,
    title: &str,
    numerator: [u64; 5],
    denominator: [u64; 5],
    against_total: bool,
) {
    let mut fractions = [0.0f64; 5];
    for i in 0..5 {
        let d = if against_total { denominator[0] } else { denominator[i] };
        fractions[i] = if d == 0 {
            0.0
        } else {
            numerator[i] as f64 / d as f64
        };
    }
    let _ = write!(
        out,
        "{:<11} {:>11.6} {:>11.6} {:>11.6} {:>11.6} {:>11.6}\n",
        title, fractions[0], fractions[1], fractions[2], fractions[3], fractions[4]
    );
}

/// Render the full per-level + DRAM report, in the source's layout.
pub fn report(hierarchy: &Hierarchy, total_events: u64) -> String {
    let mut out = String::new();
    let mut total_time = 0.0f64;

    for level in &hierarchy.levels {
        let fetch = full_count(level.counters.fetchcount);
        let miss = full_count(level.counters.misscount);

        let inst_hit_time = level.cache.hit_time_for(crate::hierarchy::Mode::InstFetch);
        let data_hit_time = level.cache.hit_time_for(crate::hierarchy::Mode::DataRead);
        let level_time = fetch[1] as f64 * inst_hit_time as f64 + fetch[2] as f64 * data_hit_time as f64;
        total_time += level_time;

        let _ = write!(out, "L{} cache\n{}", level.n, HEADER);
        print_count(&mut out, "fetches", fetch);
        print_fraction(&mut out, " fraction", fetch, fetch, true);
        print_count(&mut out, "misses", miss);
        print_fraction(&mut out, " miss rate", miss, fetch, false);
        let _ = write!(out, "Total time spent on L{}: {:.0}\n\n", level.n, level_time);
    }

    let dram_fetch = full_count(hierarchy.dram_fetchcount);
    let dram_time = dram_fetch[0] as f64 * hierarchy.dram_access_time as f64;
    total_time += dram_time;

    let _ = write!(out, "DRAM\n{}", HEADER);
    print_count(&mut out, "fetches", dram_fetch);
    print_fraction(&mut out, " fraction", dram_fetch, dram_fetch, true);
    let _ = write!(out, "Total time spent on DRAM: {:.0}\n\n", dram_time);

    let average = if total_events == 0 {
        0.0
    } else {
        total_time / total_events as f64
    };
    let _ = write!(
        out,
        "Total time: {:.0}, average time per instruction: {}\n",
        total_time, average
    );

    out
}
