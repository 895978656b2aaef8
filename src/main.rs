// Copyright (c) 2024 Mudit Bhargava
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.
//

// main.rs
//
// Entry point: parse argv into a `cli::Config`, build the cache
// hierarchy, consume the trace (file or standard input), flush every
// level's dirty lines into the next, and print the statistics report.
// Low-level engine tracing (hash lookups, victim selection, eviction)
// goes through the `log` crate's `trace!`/`debug!` macros; run
// `RUST_LOG=trace` to see it.

use std::fs::File;
use std::io::{self, BufReader};
use std::process::ExitCode;

use cachesim::cli::{self, Action};
use cachesim::errors::CacheSimError;
use cachesim::hierarchy::Hierarchy;
use cachesim::utils::logger::Logger;
use cachesim::{stats, trace};

fn run() -> Result<(), CacheSimError> {
    env_logger::init();

    let config = match cli::parse(std::env::args().skip(1))? {
        Action::Help => {
            print!("{}", cli::USAGE);
            return Ok(());
        },
        Action::Run(config) => config,
    };

    let log_file = config.log_file.as_ref().map(|p| p.to_string_lossy().into_owned());
    let mut logger = Logger::new(log_file.as_deref(), config.log_level);
    logger.info(&format!("starting cachesim with {} configured level(s)", config.levels.len()));

    let mut hierarchy = Hierarchy::from_config(&config);

    let events = match &config.trace_path {
        Some(path) => {
            logger.debug(&format!("reading trace from {}", path.display()));
            let file = File::open(path)?;
            trace::read_events(BufReader::new(file))?
        },
        None => {
            logger.debug("reading trace from standard input");
            trace::read_events(BufReader::new(io::stdin()))?
        },
    };
    logger.info(&format!("trace consumed, {} record(s)", events.len()));

    for event in &events {
        hierarchy.pair_access(0, event.addr, event.mode);
    }
    hierarchy.flush();
    logger.debug("hierarchy flushed");

    print!("{}", stats::report(&hierarchy, events.len() as u64));

    if let Some(log_file) = log_file {
        println!("\nLog file created: {}", log_file);
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cachesim: {}", err);
            ExitCode::FAILURE
        },
    }
}
