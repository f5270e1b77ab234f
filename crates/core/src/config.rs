// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run configuration.
//!
//! All tunables live in [`DedupConfig`], passed at construction time.
//! Constructing a configuration performs no I/O; paths are only
//! touched when a run starts.

use std::path::{Path, PathBuf};

/// Default directory scanned for result files.
pub const DEFAULT_RESULTS_DIR: &str = "./benchmark_results/data";

/// Default directory that receives plan/report artifacts.
pub const DEFAULT_OUTPUT_DIR: &str = "./benchmark_results";

/// Default website allow-list used to filter candidate filenames.
pub const DEFAULT_TARGET_WEBSITES: [&str; 7] = [
    "Airbnb",
    "TikTok",
    "reddit",
    "instagram",
    "facebook",
    "discord",
    "Threads",
];

/// Filename prefix of result files.
pub const RESULT_FILE_PREFIX: &str = "result_";

/// Filename suffix of result files.
pub const RESULT_FILE_SUFFIX: &str = ".json";

/// Configuration for a deduplication run.
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Directory scanned for `result_*.json` files.
    pub results_dir: PathBuf,
    /// Directory that receives plan/report artifacts.
    pub output_dir: PathBuf,
    /// Website tokens a candidate filename must contain one of.
    ///
    /// Matching is substring-based, like the benchmark harness that
    /// produced the files. A token that is a substring of another
    /// would match both; the default list has no such pair.
    pub target_websites: Vec<String>,
    /// When `true` (the default), no file is ever deleted and the run
    /// only writes a plan artifact.
    pub dry_run: bool,
    /// When set, a live run copies every scanned file here before
    /// deleting anything.
    pub backup_dir: Option<PathBuf>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            target_websites: DEFAULT_TARGET_WEBSITES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            dry_run: true,
            backup_dir: None,
        }
    }
}

impl DedupConfig {
    /// Create a configuration with the default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the results directory.
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Set the artifact output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the website allow-list.
    pub fn with_target_websites<I, S>(mut self, websites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_websites = websites.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the backup directory used before live deletion.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Whether `filename` is a candidate result file: `result_*.json`
    /// containing at least one allow-listed website token.
    pub fn is_result_file(&self, filename: &str) -> bool {
        filename.starts_with(RESULT_FILE_PREFIX)
            && filename.ends_with(RESULT_FILE_SUFFIX)
            && self
                .target_websites
                .iter()
                .any(|website| filename.contains(website.as_str()))
    }

    /// Full path of a result file inside the results directory.
    pub fn result_path(&self, filename: &str) -> PathBuf {
        self.results_dir.join(filename)
    }

    /// The results directory as a path.
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }
}
