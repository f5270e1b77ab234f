// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run orchestration.
//!
//! [`Deduplicator`] ties the pipeline together: scan, plan, then the
//! dry-run/live gate. Construction performs no I/O; only [`run`] and
//! [`check`] touch the filesystem.
//!
//! [`run`]: Deduplicator::run
//! [`check`]: Deduplicator::check

use crate::check::DuplicateCheck;
use crate::config::DedupConfig;
use crate::error::Result;
use crate::io;
use crate::plan::{DedupPlan, RunReport};
use crate::reporter::{DedupEvent, LogReporter, Reporter};
use crate::scan;
use std::fs;
use std::path::PathBuf;

/// Deletion-progress reporting cadence.
const PROGRESS_EVERY: usize = 50;

/// Whether a run was dry or live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Nothing was deleted; a plan artifact may have been written.
    DryRun,
    /// Files were deleted and a report artifact written.
    Live,
}

/// Outcome of one deduplication run.
#[derive(Debug)]
pub struct RunSummary {
    /// Whether the run was dry or live.
    pub mode: RunMode,
    /// The plan the run computed (and, when live, executed).
    pub plan: DedupPlan,
    /// Files actually deleted (always 0 for dry runs).
    pub files_deleted: usize,
    /// Per-file deletion errors (always 0 for dry runs).
    pub errors: usize,
    /// Path of the plan/report artifact, when one was written.
    pub artifact: Option<PathBuf>,
}

impl RunSummary {
    /// Whether the run completed without any per-file error.
    ///
    /// A dry run is always clean.
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// Deduplicates benchmark result files per the configured policy.
pub struct Deduplicator {
    config: DedupConfig,
    reporter: Box<dyn Reporter>,
}

impl Deduplicator {
    /// Create a deduplicator with the given configuration and the
    /// default tracing-backed reporter. Performs no I/O.
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            reporter: Box::new(LogReporter),
        }
    }

    /// Replace the progress reporter.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &DedupConfig {
        &self.config
    }

    /// Compute duplicate statistics without planning any deletion.
    pub fn check(&mut self) -> Result<DuplicateCheck> {
        let scan = scan::scan(&self.config, self.reporter.as_mut())?;
        Ok(DuplicateCheck::from_scan(&scan))
    }

    /// Execute one deduplication pass.
    ///
    /// Dry-run mode computes and persists the plan without touching any
    /// result file. Live mode backs up (when configured), deletes every
    /// planned file independently, and persists a report. An empty
    /// deletion list short-circuits without writing an artifact.
    pub fn run(&mut self) -> Result<RunSummary> {
        let scan = scan::scan(&self.config, self.reporter.as_mut())?;
        let plan = DedupPlan::build(&scan);
        self.announce(&plan);

        let mode = if self.config.dry_run {
            RunMode::DryRun
        } else {
            RunMode::Live
        };

        if !plan.has_deletions() {
            self.reporter.emit(DedupEvent::NothingToDo);
            return Ok(RunSummary {
                mode,
                plan,
                files_deleted: 0,
                errors: 0,
                artifact: None,
            });
        }

        if self.config.dry_run {
            let path = io::write_plan(&plan, &self.config.output_dir)?;
            self.reporter
                .emit(DedupEvent::PlanWritten { path: path.clone() });
            return Ok(RunSummary {
                mode,
                plan,
                files_deleted: 0,
                errors: 0,
                artifact: Some(path),
            });
        }

        if let Some(backup_dir) = self.config.backup_dir.clone() {
            io::backup_scanned_files(&scan, &backup_dir, self.reporter.as_mut())?;
        }

        let (files_deleted, errors) = execute_plan(&plan, self.reporter.as_mut());
        let report = RunReport::new(&plan, &self.config, files_deleted, errors);
        let path = io::write_report(&report, &self.config.output_dir)?;
        self.reporter
            .emit(DedupEvent::ReportWritten { path: path.clone() });

        Ok(RunSummary {
            mode,
            plan,
            files_deleted,
            errors,
            artifact: Some(path),
        })
    }

    /// Emit selection and scheduling events for an already-built plan.
    fn announce(&mut self, plan: &DedupPlan) {
        for kept in plan.keep_list.iter().filter(|k| k.total_files > 1) {
            self.reporter.emit(DedupEvent::GroupSelected {
                task_key: kept.task_key.clone(),
                kept: kept.filename.clone(),
                kept_failed: kept.success != Some(true),
                total: kept.total_files,
                failed: kept.failed_count,
            });
        }
        for entry in &plan.deletion_list {
            self.reporter.emit(DedupEvent::DeletionScheduled {
                filename: entry.filename.clone(),
                reason: entry.reason.clone(),
            });
        }
    }
}

/// Delete every file in the plan's deletion list.
///
/// Each deletion is attempted independently: a per-file failure
/// (permissions, already removed) is reported and counted, and the
/// remaining deletions proceed. Returns `(deleted, errors)`.
///
/// Only paths enumerated in the deletion list are ever touched; kept
/// files are never handed to this function.
pub fn execute_plan(plan: &DedupPlan, reporter: &mut dyn Reporter) -> (usize, usize) {
    let total = plan.deletion_list.len();
    let mut deleted = 0;
    let mut errors = 0;

    for entry in &plan.deletion_list {
        match fs::remove_file(&entry.file_path) {
            Ok(()) => {
                deleted += 1;
                if deleted % PROGRESS_EVERY == 0 {
                    reporter.emit(DedupEvent::DeletionProgress { deleted, total });
                }
            }
            Err(e) => {
                errors += 1;
                reporter.emit(DedupEvent::DeletionFailed {
                    filename: entry.filename.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    (deleted, errors)
}
