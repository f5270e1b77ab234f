// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Progress reporting.
//!
//! The engine never prints directly. Every user-visible step is an
//! event handed to a [`Reporter`], so hosts can render progress their
//! own way and tests can assert on structured events instead of text.

use crate::record::TaskKey;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// A progress event emitted during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupEvent {
    /// The scan of the results directory started.
    ScanStarted {
        /// Directory being scanned.
        dir: PathBuf,
    },
    /// The filename filter matched this many candidate files.
    FilesMatched {
        /// Number of matched files.
        count: usize,
    },
    /// A candidate file failed to parse.
    CorruptedFile {
        /// Name of the offending file.
        filename: String,
        /// Parse failure description.
        reason: String,
    },
    /// A keeper was selected for a multi-file group.
    GroupSelected {
        /// Group key.
        task_key: TaskKey,
        /// Filename of the kept record.
        kept: String,
        /// Whether the kept record is a failure.
        kept_failed: bool,
        /// Total files in the group.
        total: usize,
        /// Failed files in the group.
        failed: usize,
    },
    /// A file was scheduled for deletion.
    DeletionScheduled {
        /// Name of the file to delete.
        filename: String,
        /// Human-readable reason.
        reason: String,
    },
    /// Periodic progress during live deletion.
    DeletionProgress {
        /// Files deleted so far.
        deleted: usize,
        /// Total files to delete.
        total: usize,
    },
    /// A live deletion failed for one file.
    DeletionFailed {
        /// Name of the file that could not be deleted.
        filename: String,
        /// Underlying error message.
        message: String,
    },
    /// A backup copy failed for one file.
    BackupFailed {
        /// Name of the file that could not be copied.
        filename: String,
        /// Underlying error message.
        message: String,
    },
    /// A plan artifact was written.
    PlanWritten {
        /// Path of the artifact.
        path: PathBuf,
    },
    /// A report artifact was written.
    ReportWritten {
        /// Path of the artifact.
        path: PathBuf,
    },
    /// Nothing to delete; the run finished without an artifact.
    NothingToDo,
}

/// Observer for run progress.
pub trait Reporter {
    /// Handle one progress event.
    fn emit(&mut self, event: DedupEvent);
}

/// Reporter that logs every event through `tracing`.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn emit(&mut self, event: DedupEvent) {
        match event {
            DedupEvent::ScanStarted { dir } => {
                info!(dir = %dir.display(), "scanning results directory");
            }
            DedupEvent::FilesMatched { count } => {
                info!(count, "matched candidate result files");
            }
            DedupEvent::CorruptedFile { filename, reason } => {
                warn!(%filename, %reason, "corrupted result file");
            }
            DedupEvent::GroupSelected {
                task_key,
                kept,
                kept_failed,
                total,
                failed,
            } => {
                info!(
                    key = %task_key,
                    %kept,
                    kept_failed,
                    total,
                    failed,
                    "selected file to keep"
                );
            }
            DedupEvent::DeletionScheduled { filename, reason } => {
                info!(%filename, %reason, "scheduled for deletion");
            }
            DedupEvent::DeletionProgress { deleted, total } => {
                info!(deleted, total, "deletion progress");
            }
            DedupEvent::DeletionFailed { filename, message } => {
                error!(%filename, %message, "failed to delete file");
            }
            DedupEvent::BackupFailed { filename, message } => {
                warn!(%filename, %message, "failed to back up file");
            }
            DedupEvent::PlanWritten { path } => {
                info!(path = %path.display(), "deletion plan saved");
            }
            DedupEvent::ReportWritten { path } => {
                info!(path = %path.display(), "final report saved");
            }
            DedupEvent::NothingToDo => {
                info!("no duplicates found, nothing to remove");
            }
        }
    }
}

/// Reporter that discards every event.
#[derive(Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn emit(&mut self, _event: DedupEvent) {}
}

/// Reporter that records events for later assertions. Clones share the
/// same buffer, so a clone can be handed to the engine while the test
/// keeps reading.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    events: std::rc::Rc<std::cell::RefCell<Vec<DedupEvent>>>,
}

#[cfg(test)]
impl RecordingReporter {
    /// Snapshot of the events seen so far, in order.
    pub fn events(&self) -> Vec<DedupEvent> {
        self.events.borrow().clone()
    }
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn emit(&mut self, event: DedupEvent) {
        self.events.borrow_mut().push(event);
    }
}
