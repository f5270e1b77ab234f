// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Artifact output and pre-deletion backup.
//!
//! Plans and reports are written once, as pretty-printed JSON, to
//! timestamped files in the output directory. They are never mutated
//! after being written.

use crate::error::{Error, Result};
use crate::plan::{DedupPlan, RunReport};
use crate::record::CorruptedFile;
use crate::reporter::{DedupEvent, Reporter};
use crate::scan::Scan;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename prefix of plan artifacts.
pub const PLAN_PREFIX: &str = "analysis_dedup_plan_";

/// Filename prefix of report artifacts.
pub const REPORT_PREFIX: &str = "analysis_dedup_report_";

/// Ensure the artifact output directory exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::WriteArtifact {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write a plan artifact, returning its path.
pub fn write_plan(plan: &DedupPlan, output_dir: &Path) -> Result<PathBuf> {
    write_artifact(plan, output_dir, PLAN_PREFIX)
}

/// Write a report artifact, returning its path.
pub fn write_report(report: &RunReport, output_dir: &Path) -> Result<PathBuf> {
    write_artifact(report, output_dir, REPORT_PREFIX)
}

fn write_artifact<T: Serialize>(document: &T, output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    ensure_output_dir(output_dir)?;
    let path = output_dir.join(format!("{prefix}{}.json", Utc::now().timestamp_millis()));
    let json = serde_json::to_string_pretty(document)?;
    fs::write(&path, json).map_err(|source| Error::WriteArtifact {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Copy every scanned file (parsed and corrupted alike) into the
/// backup directory before a live deletion pass.
///
/// Failure to create the directory is fatal; a per-file copy failure is
/// reported and skipped. Returns the number of files backed up.
pub fn backup_scanned_files(
    scan: &Scan,
    backup_dir: &Path,
    reporter: &mut dyn Reporter,
) -> Result<usize> {
    fs::create_dir_all(backup_dir).map_err(|source| Error::CreateBackupDir {
        path: backup_dir.to_path_buf(),
        source,
    })?;

    let mut backed_up = 0;
    let files = scan
        .groups
        .values()
        .flatten()
        .map(|f| (&f.filename, &f.path))
        .chain(
            scan.corrupted
                .iter()
                .map(|CorruptedFile { filename, path, .. }| (filename, path)),
        );

    for (filename, path) in files {
        match fs::copy(path, backup_dir.join(filename)) {
            Ok(_) => backed_up += 1,
            Err(e) => reporter.emit(DedupEvent::BackupFailed {
                filename: filename.clone(),
                message: e.to_string(),
            }),
        }
    }
    Ok(backed_up)
}
