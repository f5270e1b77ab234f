// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Directory scanning and parsing.
//!
//! The scan is read-only: it enumerates candidate result files, parses
//! each one, and groups parsed records by [`TaskKey`]. Files that fail
//! to parse are isolated into the corrupted list; they never abort the
//! scan. Only an unreadable results directory is fatal.

use crate::config::DedupConfig;
use crate::error::{Error, Result};
use crate::record::{CorruptedFile, ParseError, ResultFile, TaskKey};
use crate::reporter::{DedupEvent, Reporter};
use std::collections::BTreeMap;
use std::fs;

/// Outcome of scanning the results directory.
#[derive(Debug, Default)]
pub struct Scan {
    /// Parsed records grouped by task key. Size-1 groups are retained
    /// but produce no deletions.
    pub groups: BTreeMap<TaskKey, Vec<ResultFile>>,
    /// Candidate files that failed to parse.
    pub corrupted: Vec<CorruptedFile>,
}

impl Scan {
    /// Total parsed files across all groups.
    pub fn parsed_files(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Groups holding more than one file.
    pub fn duplicated_groups(&self) -> impl Iterator<Item = (&TaskKey, &Vec<ResultFile>)> {
        self.groups.iter().filter(|(_, files)| files.len() > 1)
    }
}

/// Scan the results directory and group every parseable candidate.
///
/// Filenames are matched against the `result_*.json` convention and
/// the configured website allow-list before being read. Group members
/// are ordered by filename so downstream plans do not depend on the
/// directory enumeration order.
///
/// # Errors
///
/// Returns [`Error::ReadDir`] when the results directory is missing or
/// unreadable.
pub fn scan(config: &DedupConfig, reporter: &mut dyn Reporter) -> Result<Scan> {
    reporter.emit(DedupEvent::ScanStarted {
        dir: config.results_dir.clone(),
    });

    let entries = fs::read_dir(&config.results_dir).map_err(|source| Error::ReadDir {
        path: config.results_dir.clone(),
        source,
    })?;

    let mut filenames: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::ReadDir {
            path: config.results_dir.clone(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if config.is_result_file(&name) {
            filenames.push(name);
        }
    }
    // Deterministic plans regardless of read_dir ordering.
    filenames.sort_unstable();

    reporter.emit(DedupEvent::FilesMatched {
        count: filenames.len(),
    });

    let mut outcome = Scan::default();
    for filename in filenames {
        let path = config.result_path(&filename);
        let parsed = match fs::read_to_string(&path) {
            Ok(content) => ResultFile::parse(&filename, path.clone(), &content)
                .map_err(|e: ParseError| e.to_string()),
            Err(e) => Err(format!("unreadable file: {e}")),
        };

        match parsed {
            Ok(record) => {
                outcome
                    .groups
                    .entry(record.task_key.clone())
                    .or_default()
                    .push(record);
            }
            Err(reason) => {
                reporter.emit(DedupEvent::CorruptedFile {
                    filename: filename.clone(),
                    reason: reason.clone(),
                });
                outcome.corrupted.push(CorruptedFile {
                    filename,
                    path,
                    reason,
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{NullReporter, RecordingReporter};
    use std::fs;
    use tempfile::TempDir;

    fn result_json(model: &str, website: &str, task: &str, success: bool) -> String {
        format!(
            r#"{{"model": "{model}", "website": "{website}", "task": {{"id": "{task}"}}, "success": {success}}}"#
        )
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn config_for(dir: &TempDir) -> DedupConfig {
        DedupConfig::default().with_results_dir(dir.path())
    }

    #[test]
    fn test_scan_groups_by_task_key() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "result_reddit_a.json", &result_json("m1", "reddit", "t1", true));
        write_file(&dir, "result_reddit_b.json", &result_json("m1", "reddit", "t1", false));
        write_file(&dir, "result_reddit_c.json", &result_json("m1", "reddit", "t2", true));

        let scan = scan(&config_for(&dir), &mut NullReporter).unwrap();
        assert_eq!(scan.groups.len(), 2);
        assert_eq!(scan.parsed_files(), 3);
        assert_eq!(scan.duplicated_groups().count(), 1);
        assert!(scan.corrupted.is_empty());

        let key = TaskKey::new("m1", "reddit", "t1");
        assert_eq!(scan.groups[&key].len(), 2);
    }

    #[test]
    fn test_scan_filters_by_naming_convention() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "result_reddit_a.json", &result_json("m1", "reddit", "t1", true));
        // Wrong prefix, wrong suffix, and no allow-listed token.
        write_file(&dir, "summary_reddit.json", &result_json("m1", "reddit", "t2", true));
        write_file(&dir, "result_reddit_a.txt", &result_json("m1", "reddit", "t3", true));
        write_file(&dir, "result_myspace_a.json", &result_json("m1", "myspace", "t4", true));

        let scan = scan(&config_for(&dir), &mut NullReporter).unwrap();
        assert_eq!(scan.parsed_files(), 1);
        assert!(scan.corrupted.is_empty());
    }

    #[test]
    fn test_scan_isolates_corrupted_files() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "result_reddit_ok.json", &result_json("m1", "reddit", "t1", true));
        write_file(&dir, "result_reddit_bad.json", "{ not json");
        write_file(&dir, "result_reddit_incomplete.json", r#"{"model": "m1"}"#);

        let mut reporter = RecordingReporter::default();
        let scan = scan(&config_for(&dir), &mut reporter).unwrap();

        assert_eq!(scan.parsed_files(), 1);
        assert_eq!(scan.corrupted.len(), 2);
        let corrupted_events = reporter
            .events()
            .iter()
            .filter(|e| matches!(e, DedupEvent::CorruptedFile { .. }))
            .count();
        assert_eq!(corrupted_events, 2);
    }

    #[test]
    fn test_scan_orders_group_members_by_filename() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "result_reddit_z.json", &result_json("m1", "reddit", "t1", true));
        write_file(&dir, "result_reddit_a.json", &result_json("m1", "reddit", "t1", true));

        let scan = scan(&config_for(&dir), &mut NullReporter).unwrap();
        let key = TaskKey::new("m1", "reddit", "t1");
        let names: Vec<&str> = scan.groups[&key].iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["result_reddit_a.json", "result_reddit_z.json"]);
    }

    #[test]
    fn test_scan_missing_directory_is_fatal() {
        let config = DedupConfig::default().with_results_dir("/nonexistent/bench/data");
        let err = scan(&config, &mut NullReporter).unwrap_err();
        assert!(matches!(err, Error::ReadDir { .. }));
        assert!(err.to_string().contains("/nonexistent/bench/data"));
    }

    #[test]
    fn test_scan_emits_match_count() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "result_reddit_a.json", &result_json("m1", "reddit", "t1", true));

        let mut reporter = RecordingReporter::default();
        scan(&config_for(&dir), &mut reporter).unwrap();
        assert!(reporter
            .events()
            .contains(&DedupEvent::FilesMatched { count: 1 }));
    }
}
