// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plan and report documents.
//!
//! The plan is a pure function of the scan outcome: the same input
//! snapshot always yields the same keep/deletion lists, so the plan
//! written by a dry run is the exact predicted outcome of a live run.
//! Wire field names are camelCase to match the artifact format the
//! analysis pipeline already consumes.

use crate::record::TaskKey;
use crate::scan::Scan;
use crate::{policy, DedupConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Strategy label recorded in plan artifacts.
pub const PLAN_STRATEGY: &str = "keep_failed_for_analysis";

/// Operation label recorded in report artifacts.
pub const REPORT_OPERATION: &str = "analysis_deduplication";

/// Strategy label recorded in report artifacts.
pub const REPORT_STRATEGY: &str = "prioritize_failed_for_error_analysis";

/// Task-key placeholder used for corrupted files in the deletion list.
pub const CORRUPTED_KEY: &str = "CORRUPTED";

/// One kept file, with statistics about its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepEntry {
    /// Group key.
    pub task_key: TaskKey,
    /// Filename of the kept record.
    pub filename: String,
    /// Success flag of the kept record, absent when the file had none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Error classification of the kept record.
    pub error_type: String,
    /// Total files in the group.
    pub total_files: usize,
    /// Failed files in the group.
    pub failed_count: usize,
}

/// One file scheduled for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntry {
    /// Name of the file.
    pub filename: String,
    /// Full path of the file.
    pub file_path: PathBuf,
    /// Group key, or [`CORRUPTED_KEY`] for unparseable files.
    pub task_key: String,
    /// Why the file is being deleted.
    pub reason: String,
}

/// The deduplication plan: what would be kept and deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupPlan {
    /// When the plan was computed.
    pub timestamp: DateTime<Utc>,
    /// Selection strategy label.
    pub strategy: String,
    /// Total distinct task keys seen.
    pub unique_combinations: usize,
    /// Task keys with more than one file.
    pub duplicated_combinations: usize,
    /// Candidate files that failed to parse.
    pub corrupted_files: usize,
    /// Files retained (one per group).
    pub files_to_keep: usize,
    /// Files scheduled for deletion.
    pub files_to_delete: usize,
    /// Kept records that are themselves failures.
    pub failed_combinations_kept: usize,
    /// Every file scheduled for deletion, with its reason.
    pub deletion_list: Vec<DeleteEntry>,
    /// Every kept file, with group statistics.
    pub keep_list: Vec<KeepEntry>,
}

impl DedupPlan {
    /// Build the plan for a scan outcome. Pure: no I/O, identical for
    /// dry and live runs.
    pub fn build(scan: &Scan) -> Self {
        let mut keep_list = Vec::with_capacity(scan.groups.len());
        let mut deletion_list = Vec::new();
        let mut failed_combinations_kept = 0;

        for (task_key, files) in &scan.groups {
            let kept = policy::select_keeper(files);
            let failed_count = files.iter().filter(|f| f.is_failure()).count();

            if kept.is_failure() {
                failed_combinations_kept += 1;
            }
            keep_list.push(KeepEntry {
                task_key: task_key.clone(),
                filename: kept.filename.clone(),
                success: kept.success,
                error_type: kept.error_type.clone(),
                total_files: files.len(),
                failed_count,
            });

            let kept_status = if kept.is_failure() { "failed" } else { "successful" };
            for file in files.iter().filter(|f| f.filename != kept.filename) {
                deletion_list.push(DeleteEntry {
                    filename: file.filename.clone(),
                    file_path: file.path.clone(),
                    task_key: task_key.as_str().to_string(),
                    reason: format!("duplicate removal - keeping {} ({kept_status})", kept.filename),
                });
            }
        }

        for corrupted in &scan.corrupted {
            deletion_list.push(DeleteEntry {
                filename: corrupted.filename.clone(),
                file_path: corrupted.path.clone(),
                task_key: CORRUPTED_KEY.to_string(),
                reason: "corrupted JSON file".to_string(),
            });
        }

        Self {
            timestamp: Utc::now(),
            strategy: PLAN_STRATEGY.to_string(),
            unique_combinations: scan.groups.len(),
            duplicated_combinations: scan.duplicated_groups().count(),
            corrupted_files: scan.corrupted.len(),
            files_to_keep: keep_list.len(),
            files_to_delete: deletion_list.len(),
            failed_combinations_kept,
            deletion_list,
            keep_list,
        }
    }

    /// Whether the plan schedules any deletion at all.
    pub fn has_deletions(&self) -> bool {
        !self.deletion_list.is_empty()
    }
}

/// Report written after a live run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Operation label.
    pub operation: String,
    /// Selection strategy label.
    pub strategy: String,
    /// Files actually deleted.
    pub files_deleted_count: usize,
    /// Files retained.
    pub files_kept_count: usize,
    /// Per-file deletion errors.
    pub errors_count: usize,
    /// Kept records that are themselves failures.
    pub failed_combinations_kept: usize,
    /// Website allow-list used by the run.
    pub target_websites: Vec<String>,
    /// Backup directory, when a backup was taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_location: Option<PathBuf>,
}

impl RunReport {
    /// Build the report for an executed plan.
    pub fn new(plan: &DedupPlan, config: &DedupConfig, deleted: usize, errors: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: REPORT_OPERATION.to_string(),
            strategy: REPORT_STRATEGY.to_string(),
            files_deleted_count: deleted,
            files_kept_count: plan.files_to_keep,
            errors_count: errors,
            failed_combinations_kept: plan.failed_combinations_kept,
            target_websites: config.target_websites.clone(),
            backup_location: config.backup_dir.clone(),
        }
    }
}
