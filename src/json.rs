use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::patch::ApplyStats;

/// Machine-readable result of an apply run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Unique identifier for this run
    pub run_id: String,
    /// Whether the run completed
    pub success: bool,
    /// Error message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Checksum of the log file as read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_checksum: Option<String>,
    /// Checksum of the processed snapshot as written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_checksum: Option<String>,
    /// Replace commands applied
    pub replaced: usize,
    /// Lines deleted
    pub deleted: usize,
    /// Lines inserted
    pub inserted: usize,
    /// Commands skipped (parse failures plus out-of-range targets)
    pub skipped: usize,
    /// Per-command warnings, in processing order
    pub warnings: Vec<String>,
}

impl ApplyReport {
    /// Build a report for a completed run
    pub fn success(
        run_id: String,
        source_checksum: String,
        result_checksum: String,
        stats: ApplyStats,
        parse_skipped: usize,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            run_id,
            success: true,
            error: None,
            source_checksum: Some(source_checksum),
            result_checksum: Some(result_checksum),
            replaced: stats.replaced,
            deleted: stats.deleted,
            inserted: stats.inserted,
            skipped: stats.skipped + parse_skipped,
            warnings,
        }
    }

    /// Build a report for a run that aborted before writing any output
    pub fn failure(run_id: String, error: String) -> Self {
        Self {
            run_id,
            success: false,
            error: Some(error),
            source_checksum: None,
            result_checksum: None,
            replaced: 0,
            deleted: 0,
            inserted: 0,
            skipped: 0,
            warnings: Vec::new(),
        }
    }
}

/// Machine-readable result of a diff run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    /// Unique identifier for this run
    pub run_id: String,
    /// Whether the run completed
    pub success: bool,
    /// Error message when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Total commands generated
    pub command_count: usize,
    /// Replace commands generated
    pub replacements: usize,
    /// Insert commands generated
    pub insertions: usize,
    /// Delete commands generated
    pub deletions: usize,
}

impl DiffReport {
    /// Build a report for a completed diff
    pub fn success(run_id: String, replacements: usize, insertions: usize, deletions: usize) -> Self {
        Self {
            run_id,
            success: true,
            error: None,
            command_count: replacements + insertions + deletions,
            replacements,
            insertions,
            deletions,
        }
    }

    /// Build a report for a diff that aborted before writing any output
    pub fn failure(run_id: String, error: String) -> Self {
        Self {
            run_id,
            success: false,
            error: Some(error),
            command_count: 0,
            replacements: 0,
            insertions: 0,
            deletions: 0,
        }
    }
}

/// Generate a unique run identifier
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
