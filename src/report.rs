use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::snapshot::LogSnapshot;

/// Counts of log lines per level
///
/// All known levels are fields, so every level appears in the report even
/// when its count is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub info: usize,
    pub error: usize,
    pub warn: usize,
}

impl LevelCounts {
    /// Render the summary report, one `LEVEL: <n>` line per level
    pub fn render(&self) -> String {
        format!(
            "INFO: {}\nERROR: {}\nWARN: {}\n",
            self.info, self.error, self.warn
        )
    }
}

/// Count INFO/ERROR/WARN lines in a snapshot
///
/// A line is classified by the first of the literal markers `] INFO`,
/// `] ERROR`, `] WARN` it contains, in that order.
pub fn count_log_levels(snapshot: &LogSnapshot) -> LevelCounts {
    let mut counts = LevelCounts::default();

    for line in snapshot.iter() {
        if line.contains("] INFO") {
            counts.info += 1;
        } else if line.contains("] ERROR") {
            counts.error += 1;
        } else if line.contains("] WARN") {
            counts.warn += 1;
        }
    }

    counts
}

fn login_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"User '(\w+)' logged in").expect("login pattern is valid")
    })
}

/// Count login events per username
///
/// Matches lines of the form `User '<name>' logged in` and tallies the
/// captured username. The BTreeMap keeps usernames sorted for the report.
pub fn count_user_logins(snapshot: &LogSnapshot) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for line in snapshot.iter() {
        if let Some(captures) = login_pattern().captures(line) {
            *counts.entry(captures[1].to_string()).or_insert(0) += 1;
        }
    }

    counts
}

/// Render the login summary report
pub fn render_login_report(counts: &BTreeMap<String, usize>) -> String {
    let mut report = String::from("User Login Counts:\n");
    for (user, count) in counts {
        report.push_str(&format!("{}: {}\n", user, count));
    }
    report
}
