// Snapshot model and file I/O
pub mod snapshot;

// Command model and script parsing
pub mod command;

// Positional diff generation
pub mod diff;

// Patch application
pub mod patch;

// Log aggregation and summary reports
pub mod report;

// JSON output module
pub mod json;

// Re-exports
pub use snapshot::{
    LogSnapshot, LoadedSnapshot, SnapshotError,
    read_snapshot, read_text, split_lines, write_snapshot,
};
pub use command::{
    Command, CommandScript, ParseOutcome, ParsedScript,
    parse_line, parse_script, serialize, serialize_script,
};
pub use diff::generate;
pub use patch::{ApplyOutcome, ApplyStats, apply, timestamp_prefix};
pub use report::{
    LevelCounts, count_log_levels, count_user_logins, render_login_report,
};
pub use json::{ApplyReport, DiffReport, generate_run_id};
