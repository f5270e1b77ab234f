// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Selection policy: keep exactly one file per duplicated group.
//!
//! Failed results outrank successful ones regardless of recency: a
//! failure is the analytically valuable record, and the tool must never
//! discard the only failing evidence of a group. Within a partition,
//! recency alone is not trusted as a proxy for "most informative".
//! Retries commonly grow logs, so file size and attempt number break
//! timestamp ties.

use crate::record::ResultFile;
use std::cmp::Ordering;

/// Choose the record to keep from a group of duplicates.
///
/// Order of precedence:
/// 1. If any record is a failure (`success != true`), select among the
///    failures only.
/// 2. Otherwise select among the successes.
/// 3. Within the partition: most recent timestamp (missing = epoch),
///    then largest size, then highest attempt.
///
/// The final fallback to the first record in group order is a guard;
/// the two partitions cover every record.
pub fn select_keeper<'a>(files: &'a [ResultFile]) -> &'a ResultFile {
    let failed: Vec<&ResultFile> = files.iter().filter(|f| f.is_failure()).collect();
    let successful: Vec<&ResultFile> = files.iter().filter(|f| !f.is_failure()).collect();

    if let Some(best) = best_of(&failed) {
        return best;
    }
    if let Some(best) = best_of(&successful) {
        return best;
    }
    &files[0]
}

fn best_of<'a>(partition: &[&'a ResultFile]) -> Option<&'a ResultFile> {
    let mut sorted = partition.to_vec();
    sorted.sort_by(|a, b| preference(a, b));
    sorted.first().copied()
}

/// Ordering that places the preferred record first.
fn preference(a: &ResultFile, b: &ResultFile) -> Ordering {
    b.timestamp_millis()
        .cmp(&a.timestamp_millis())
        .then_with(|| b.size.cmp(&a.size))
        .then_with(|| b.attempt.cmp(&a.attempt))
}
