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

// lib.rs
//
// cachesim: a multi-level CPU cache hierarchy simulator. `cache` is the
// engine (order list, hash, set, level) with no knowledge of other
// levels; `hierarchy` routes accesses across levels down to an implicit
// DRAM sentinel, handling write-allocate, writeback propagation, and
// block-size expansion; `cli` and `trace` are the external collaborators
// that turn argv and a trace file into calls against the engine; `stats`
// renders the final per-level report.

pub mod cache;
pub mod cli;
pub mod errors;
pub mod hierarchy;
pub mod stats;
pub mod trace;
pub mod utils;

pub use cache::{CacheGeometry, ReplacementPolicy};
pub use hierarchy::Hierarchy;
