//! TOC Core - table-of-contents summaries for structural diffs.
//!
//! Given the structural diff between two versions of a source file, this
//! crate reports which functions and methods were added, removed or modified,
//! and which regions failed to parse.
//!
//! # Features
//!
//! - **Context-aware naming**: nested edits are reported under the enclosing
//!   function or method, with Go-style receivers rendered as `(Foo) Bar`
//! - **Deduplication**: one entry per declaration, case-insensitive merging
//!   of add/remove pairs into modifications
//! - **Parallel summaries**: many files summarized concurrently using Rayon
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use toc_core::{input::FileDiff, summarize};
//!
//! let diff = FileDiff::load(Path::new("change.json"))?;
//! let summary = summarize(&diff);
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rayon::prelude::*;
use tracing::debug;

pub mod differ;
pub mod error;
pub mod input;
pub mod namer;
pub mod summary;
pub mod types;

use differ::{dedup, ChangeRecord, DiffWalker};
use input::FileDiff;
use summary::TocSummary;

/// Deduplicated change records for one file diff.
pub fn change_records(file: &FileDiff) -> Vec<ChangeRecord> {
    dedup(raw_change_records(file))
}

/// Change records for one file diff, before deduplication.
pub fn raw_change_records(file: &FileDiff) -> Vec<ChangeRecord> {
    DiffWalker::new(&file.before_source, &file.after_source).walk(&file.diff)
}

/// Summarize one file diff.
pub fn summarize(file: &FileDiff) -> TocSummary {
    let key = file.key();
    let records = change_records(file);
    debug!(key = %key, records = records.len(), "summarized file");
    TocSummary::from_records(&key, &records)
}

/// Summarize many file diffs in parallel, merged in input order.
///
/// `num_threads` sizes a dedicated pool; `None` or `Some(0)` uses the global
/// Rayon pool.
pub fn summarize_all(files: &[FileDiff], num_threads: Option<usize>) -> TocSummary {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };

    let summaries: Vec<TocSummary> = match pool {
        Some(pool) => pool.install(|| files.par_iter().map(summarize).collect()),
        None => files.par_iter().map(summarize).collect(),
    };

    summaries
        .into_iter()
        .fold(TocSummary::new(), |mut merged, summary| {
            merged.merge(summary);
            merged
        })
}
