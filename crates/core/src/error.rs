// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the deduplication engine.
//!
//! Only run-level failures surface here. Per-file problems (a result
//! file that fails to parse, a deletion that fails) are recorded in the
//! plan/report documents instead of aborting the run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a deduplication run.
#[derive(Debug, Error)]
pub enum Error {
    /// The results directory is missing or unreadable.
    ///
    /// The run cannot proceed without its input directory, so this is
    /// fatal rather than recovered per-file.
    #[error("cannot read results directory {}: {source}", path.display())]
    ReadDir {
        /// Directory that failed to enumerate.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A plan or report artifact could not be written.
    #[error("cannot write artifact {}: {source}", path.display())]
    WriteArtifact {
        /// Artifact path that failed to write.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The backup directory could not be created before a live run.
    #[error("cannot create backup directory {}: {source}", path.display())]
    CreateBackupDir {
        /// Backup directory that failed to create.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An output document failed to serialize.
    #[error("cannot serialize output document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for deduplication operations.
pub type Result<T> = std::result::Result<T, Error>;
