// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Read-only duplicate statistics.
//!
//! Answers "how duplicated is this directory?" without planning or
//! performing any deletion. Useful before opting into a live run.

use crate::record::TaskKey;
use crate::scan::Scan;
use serde::{Deserialize, Serialize};

/// One duplicated combination, for top-N displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatedCombination {
    /// Group key.
    pub task_key: TaskKey,
    /// Files sharing the key.
    pub count: usize,
    /// How many of them succeeded.
    pub success_count: usize,
}

/// Duplicate statistics for a results directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheck {
    /// Parseable result files found.
    pub total_files: usize,
    /// Distinct task keys.
    pub unique_combinations: usize,
    /// Task keys with at least one successful record.
    pub successful_combinations: usize,
    /// Task keys with more than one file.
    pub duplicated_combinations: usize,
    /// Surplus files (beyond one per duplicated key).
    pub total_duplicate_files: usize,
    /// Candidate files that failed to parse.
    pub corrupted_files: usize,
    /// Duplicated combinations, most-duplicated first.
    pub duplicates: Vec<DuplicatedCombination>,
}

impl DuplicateCheck {
    /// Compute duplicate statistics from a scan outcome.
    pub fn from_scan(scan: &Scan) -> Self {
        let mut successful_combinations = 0;
        let mut total_duplicate_files = 0;
        let mut duplicates = Vec::new();

        for (task_key, files) in &scan.groups {
            if files.iter().any(|f| !f.is_failure()) {
                successful_combinations += 1;
            }
            if files.len() > 1 {
                total_duplicate_files += files.len() - 1;
                duplicates.push(DuplicatedCombination {
                    task_key: task_key.clone(),
                    count: files.len(),
                    success_count: files.iter().filter(|f| !f.is_failure()).count(),
                });
            }
        }
        // Most-duplicated first; key order breaks count ties so the
        // listing is stable.
        duplicates.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.task_key.cmp(&b.task_key))
        });

        Self {
            total_files: scan.parsed_files(),
            unique_combinations: scan.groups.len(),
            successful_combinations,
            duplicated_combinations: duplicates.len(),
            total_duplicate_files,
            corrupted_files: scan.corrupted.len(),
            duplicates,
        }
    }

    /// The `n` most duplicated combinations.
    pub fn top_duplicates(&self, n: usize) -> &[DuplicatedCombination] {
        &self.duplicates[..self.duplicates.len().min(n)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ResultFile;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn file(name: &str, key: &TaskKey, success: bool) -> ResultFile {
        ResultFile {
            filename: name.to_string(),
            path: PathBuf::from(name),
            task_key: key.clone(),
            success: Some(success),
            timestamp: None,
            attempt: 1,
            error_type: "unknown".to_string(),
            log_entries: 0,
            size: 10,
        }
    }

    fn fixture() -> Scan {
        let k1 = TaskKey::new("m", "reddit", "t1");
        let k2 = TaskKey::new("m", "reddit", "t2");
        let k3 = TaskKey::new("m", "discord", "t3");
        Scan {
            groups: BTreeMap::from([
                (
                    k1.clone(),
                    vec![
                        file("a.json", &k1, true),
                        file("b.json", &k1, false),
                        file("c.json", &k1, false),
                    ],
                ),
                (
                    k2.clone(),
                    vec![file("d.json", &k2, false), file("e.json", &k2, false)],
                ),
                (k3.clone(), vec![file("f.json", &k3, true)]),
            ]),
            corrupted: vec![],
        }
    }

    #[test]
    fn test_check_counters() {
        let check = DuplicateCheck::from_scan(&fixture());
        assert_eq!(check.total_files, 6);
        assert_eq!(check.unique_combinations, 3);
        assert_eq!(check.successful_combinations, 2);
        assert_eq!(check.duplicated_combinations, 2);
        assert_eq!(check.total_duplicate_files, 3);
    }

    #[test]
    fn test_check_orders_most_duplicated_first() {
        let check = DuplicateCheck::from_scan(&fixture());
        assert_eq!(check.duplicates[0].count, 3);
        assert_eq!(check.duplicates[0].success_count, 1);
        assert_eq!(check.duplicates[1].count, 2);
        assert_eq!(check.duplicates[1].success_count, 0);
    }

    #[test]
    fn test_top_duplicates_clamps() {
        let check = DuplicateCheck::from_scan(&fixture());
        assert_eq!(check.top_duplicates(10).len(), 2);
        assert_eq!(check.top_duplicates(1).len(), 1);
    }

    #[test]
    fn test_check_on_empty_scan() {
        let check = DuplicateCheck::from_scan(&Scan::default());
        assert_eq!(check.total_files, 0);
        assert_eq!(check.duplicated_combinations, 0);
        assert!(check.duplicates.is_empty());
    }
}
