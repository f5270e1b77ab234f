// Copyright 2025 Bench Dedup Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parsed result records and their grouping key.
//!
//! Each benchmark result file describes one (model, website, task)
//! execution attempt. Repeated attempts at the same combination share a
//! [`TaskKey`] and are candidates for deduplication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Separator between the components of a [`TaskKey`].
const KEY_SEPARATOR: &str = "__";

/// Composite key identifying one logical unit of benchmark work:
/// `model __ website __ task id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    /// Build a key from its components.
    pub fn new(model: &str, website: &str, task_id: &str) -> Self {
        Self(format!(
            "{model}{KEY_SEPARATOR}{website}{KEY_SEPARATOR}{task_id}"
        ))
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the key back into (model, website, task id), when the
    /// components themselves contain no separator.
    pub fn parts(&self) -> Option<(&str, &str, &str)> {
        let mut it = self.0.split(KEY_SEPARATOR);
        match (it.next(), it.next(), it.next(), it.next()) {
            (Some(model), Some(website), Some(task_id), None) => Some((model, website, task_id)),
            _ => None,
        }
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a candidate file was routed to the corrupted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The content is not valid JSON.
    InvalidJson(String),
    /// The JSON parsed but a required field is missing or empty.
    MissingField(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidJson(msg) => write!(f, "invalid JSON: {msg}"),
            ParseError::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

/// Raw wire shape of a result file. Everything beyond the composite-key
/// fields is optional and defaulted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResult {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    task: Option<RawTask>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    attempt: Option<u32>,
    #[serde(default)]
    error_type: Option<String>,
    #[serde(default)]
    execution_logs: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    #[serde(default)]
    id: Option<String>,
}

/// One parsed result file, ready for grouping and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFile {
    /// Name of the file inside the results directory.
    pub filename: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Grouping key derived from model, website and task id.
    pub task_key: TaskKey,
    /// Whether the attempt succeeded. `None` counts as failed.
    pub success: Option<bool>,
    /// Execution timestamp. `None` sorts as the epoch.
    pub timestamp: Option<DateTime<Utc>>,
    /// Retry attempt number, at least 1.
    pub attempt: u32,
    /// Error classification, `"unknown"` when absent.
    pub error_type: String,
    /// Number of execution log entries carried by the file.
    pub log_entries: usize,
    /// Byte length of the raw file content.
    pub size: u64,
}

impl ResultFile {
    /// Parse a result file from its raw content.
    ///
    /// Returns [`ParseError`] when the content is not JSON or lacks one
    /// of the required fields (`model`, `website`, `task.id`); the
    /// caller routes such files to the corrupted list.
    pub fn parse(filename: &str, path: PathBuf, content: &str) -> Result<Self, ParseError> {
        let raw: RawResult = serde_json::from_str(content)
            .map_err(|e| ParseError::InvalidJson(e.to_string()))?;

        let model = required(raw.model, "model")?;
        let website = required(raw.website, "website")?;
        let task_id = required(raw.task.and_then(|t| t.id), "task.id")?;

        let timestamp = raw
            .timestamp
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let attempt = match raw.attempt {
            Some(a) if a > 0 => a,
            _ => 1,
        };

        Ok(Self {
            filename: filename.to_string(),
            path,
            task_key: TaskKey::new(&model, &website, &task_id),
            success: raw.success,
            timestamp,
            attempt,
            error_type: raw.error_type.unwrap_or_else(|| "unknown".to_string()),
            log_entries: raw.execution_logs.map(|logs| logs.len()).unwrap_or(0),
            size: content.len() as u64,
        })
    }

    /// Whether this record counts as a failure for selection purposes.
    ///
    /// A missing `success` flag is treated as failed.
    pub fn is_failure(&self) -> bool {
        self.success != Some(true)
    }

    /// Timestamp in milliseconds since the epoch, 0 when absent.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.map(|t| t.timestamp_millis()).unwrap_or(0)
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ParseError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ParseError::MissingField(field)),
    }
}

/// A candidate file that failed to parse; always scheduled for
/// deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptedFile {
    /// Name of the file inside the results directory.
    pub filename: String,
    /// Full path of the file.
    pub path: PathBuf,
    /// Why parsing failed.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ResultFile, ParseError> {
        ResultFile::parse("result_x.json", PathBuf::from("/data/result_x.json"), content)
    }

    #[test]
    fn test_parse_full_record() {
        let content = r#"{
            "model": "openai/gpt-4.1",
            "website": "reddit",
            "task": {"id": "task-7"},
            "success": false,
            "timestamp": "2024-01-02T03:04:05Z",
            "attempt": 3,
            "errorType": "timeout",
            "executionLogs": [{"step": 1}, {"step": 2}]
        }"#;
        let record = parse(content).unwrap();
        assert_eq!(
            record.task_key,
            TaskKey::new("openai/gpt-4.1", "reddit", "task-7")
        );
        assert_eq!(record.success, Some(false));
        assert_eq!(record.attempt, 3);
        assert_eq!(record.error_type, "timeout");
        assert_eq!(record.log_entries, 2);
        assert_eq!(record.size, content.len() as u64);
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn test_parse_defaults_optional_fields() {
        let record = parse(
            r#"{"model": "m", "website": "reddit", "task": {"id": "t1"}}"#,
        )
        .unwrap();
        assert_eq!(record.success, None);
        assert!(record.is_failure());
        assert_eq!(record.timestamp, None);
        assert_eq!(record.timestamp_millis(), 0);
        assert_eq!(record.attempt, 1);
        assert_eq!(record.error_type, "unknown");
        assert_eq!(record.log_entries, 0);
    }

    #[test]
    fn test_parse_zero_attempt_becomes_one() {
        let record = parse(
            r#"{"model": "m", "website": "reddit", "task": {"id": "t1"}, "attempt": 0}"#,
        )
        .unwrap();
        assert_eq!(record.attempt, 1);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse("not json at all").unwrap_err();
        assert!(matches!(err, ParseError::InvalidJson(_)));
    }

    #[test]
    fn test_parse_rejects_missing_required_fields() {
        let err = parse(r#"{"website": "reddit", "task": {"id": "t1"}}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField("model"));

        let err = parse(r#"{"model": "m", "task": {"id": "t1"}}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField("website"));

        let err = parse(r#"{"model": "m", "website": "reddit"}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField("task.id"));

        let err = parse(r#"{"model": "m", "website": "reddit", "task": {}}"#).unwrap_err();
        assert_eq!(err, ParseError::MissingField("task.id"));
    }

    #[test]
    fn test_parse_unparseable_timestamp_treated_as_absent() {
        let record = parse(
            r#"{"model": "m", "website": "reddit", "task": {"id": "t1"}, "timestamp": "yesterday"}"#,
        )
        .unwrap();
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_task_key_parts() {
        let key = TaskKey::new("modelA", "siteX", "task1");
        assert_eq!(key.as_str(), "modelA__siteX__task1");
        assert_eq!(key.parts(), Some(("modelA", "siteX", "task1")));
    }

    #[test]
    fn test_success_true_is_not_failure() {
        let record = parse(
            r#"{"model": "m", "website": "reddit", "task": {"id": "t1"}, "success": true}"#,
        )
        .unwrap();
        assert!(!record.is_failure());
    }
}
