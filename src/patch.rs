use std::collections::BTreeSet;

use crate::command::Command;
use crate::snapshot::LogSnapshot;

/// Counts of command outcomes from one application call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    /// Replace commands applied after the range check
    pub replaced: usize,
    /// Distinct source lines removed
    pub deleted: usize,
    /// Lines appended to the end of the result
    pub inserted: usize,
    /// Commands skipped for an out-of-range target
    pub skipped: usize,
}

/// Result of applying a command script to a snapshot
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// The rebuilt snapshot
    pub result: LogSnapshot,
    /// Outcome counts
    pub stats: ApplyStats,
    /// One warning per skipped command, with its 1-based line number
    pub warnings: Vec<String>,
}

/// Extract the leading timestamp prefix of a log line
///
/// The prefix is everything up to and including the first `]`. A line with
/// no `]` yields the entire line with a `]` appended — inherited split
/// semantics kept verbatim, see DESIGN.md.
pub fn timestamp_prefix(line: &str) -> String {
    match line.find(']') {
        Some(p) => line[..=p].to_string(),
        None => format!("{}]", line),
    }
}

/// Compute the replacement for one line
///
/// Bare message text is grafted onto the original line's timestamp prefix.
/// Text that carries its own bracketed timestamp (as diff-generated
/// replacements do), or text targeting a line with no bracket, replaces the
/// whole line; this is what makes diff-generated scripts reproduce the
/// target exactly.
fn replace_line(original: &str, text: &str) -> String {
    if text.starts_with('[') || !original.contains(']') {
        text.to_string()
    } else {
        format!("{} {}", timestamp_prefix(original), text)
    }
}

/// Apply a command script to a snapshot, producing a new snapshot
///
/// All Replace and Delete line numbers refer to `source` as passed in:
/// deleting line 3 does not change which line a later `Replace 4` targets.
/// Processing order is fixed regardless of script order:
///
/// 1. Partition the script into a delete-index set, replace pairs, and an
///    ordered list of insert texts, range-checking Replace/Delete targets.
/// 2. Apply replaces against original indices.
/// 3. Rebuild the sequence, omitting deleted indices.
/// 4. Append all insert texts in script order.
///
/// Out-of-range targets are skipped, counted, and surfaced as warnings with
/// their 1-based line number; they never abort the call. Duplicate deletes
/// of the same line are idempotent and counted once.
pub fn apply(source: &LogSnapshot, script: &[Command]) -> ApplyOutcome {
    let mut stats = ApplyStats::default();
    let mut warnings = Vec::new();

    let mut delete_indices: BTreeSet<usize> = BTreeSet::new();
    let mut replaces: Vec<(usize, &str)> = Vec::new();
    let mut inserts: Vec<&str> = Vec::new();

    for cmd in script {
        match cmd {
            Command::Replace { line, text } => match checked_index(*line, source.len()) {
                Some(index) => replaces.push((index, text.as_str())),
                None => {
                    stats.skipped += 1;
                    warnings.push(format!(
                        "Skipped REPLACE for line {} as it is out of range",
                        line
                    ));
                }
            },
            Command::Delete { line } => match checked_index(*line, source.len()) {
                Some(index) => {
                    delete_indices.insert(index);
                }
                None => {
                    stats.skipped += 1;
                    warnings.push(format!(
                        "Skipped DELETE for line {} as it is out of range",
                        line
                    ));
                }
            },
            Command::Insert { text } => inserts.push(text.as_str()),
        }
    }

    let mut lines: Vec<String> = source.lines().to_vec();

    for (index, text) in replaces {
        lines[index] = replace_line(&lines[index], text);
        stats.replaced += 1;
    }

    stats.deleted = delete_indices.len();

    let mut result: Vec<String> = lines
        .into_iter()
        .enumerate()
        .filter(|(i, _)| !delete_indices.contains(i))
        .map(|(_, line)| line)
        .collect();

    stats.inserted = inserts.len();
    result.extend(inserts.into_iter().map(str::to_string));

    ApplyOutcome {
        result: LogSnapshot::from_lines(result),
        stats,
        warnings,
    }
}

/// Convert a 1-based external line number into a 0-based index, if in range
fn checked_index(line: usize, len: usize) -> Option<usize> {
    let index = line.checked_sub(1)?;
    (index < len).then_some(index)
}
