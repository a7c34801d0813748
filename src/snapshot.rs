use std::path::Path;
use std::io;
use std::fs;
use regex::Regex;

/// An ordered sequence of log lines loaded into memory
///
/// Lines are 0-indexed internally; every externally visible line number
/// (command text, warnings) is 1-based. A snapshot is never mutated in
/// place: the patch applier and diff generator take snapshots by reference
/// and build new ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogSnapshot {
    lines: Vec<String>,
}

impl LogSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Create a snapshot from an iterator of lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of lines in the snapshot
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the snapshot has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line at a 0-based index, if it exists
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Iterate over lines as string slices
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Iterate over lines containing the given substring
    ///
    /// Iteration helper for aggregators that count by literal marker,
    /// e.g. `"] ERROR"`.
    pub fn lines_containing<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |line| line.contains(needle))
    }

    /// Iterate over lines matched by the given pattern
    pub fn lines_matching<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = &'a str> {
        self.iter().filter(move |line| pattern.is_match(line))
    }

    /// Render the snapshot in file form
    ///
    /// Lines are newline-joined with a trailing newline; an empty snapshot
    /// renders as the empty string.
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            String::new()
        } else {
            let mut text = self.lines.join("\n");
            text.push('\n');
            text
        }
    }

    /// BLAKE3 checksum of the rendered form (hex-encoded)
    pub fn checksum(&self) -> String {
        blake3::hash(self.render().as_bytes()).to_hex().to_string()
    }
}

/// A snapshot read from disk, along with the checksum of its content
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    /// The parsed line sequence
    pub snapshot: LogSnapshot,
    /// BLAKE3 hash of the content as read (hex-encoded)
    pub checksum: String,
}

/// Error types for snapshot file operations
#[derive(Debug)]
pub enum SnapshotError {
    NotFound(String),
    IoError(String),
    InvalidUtf8(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::NotFound(p) => write!(f, "File not found: {}", p),
            SnapshotError::IoError(e) => write!(f, "I/O error: {}", e),
            SnapshotError::InvalidUtf8(p) => write!(f, "Invalid UTF-8 in file: {}", p),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<io::Error> for SnapshotError {
    fn from(err: io::Error) -> Self {
        SnapshotError::IoError(err.to_string())
    }
}

/// Read a text file from disk with UTF-8 validation
///
/// A missing file is the fatal error class: callers abort before writing
/// any output rather than continuing with a partial run.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<String, SnapshotError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(SnapshotError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;

    String::from_utf8(bytes)
        .map_err(|_| SnapshotError::InvalidUtf8(path_ref.display().to_string()))
}

/// Split file content into lines
///
/// Splits on `\n`, strips a trailing `\r` from each line, and drops the
/// empty segment after a final newline.
pub fn split_lines(content: &str) -> Vec<String> {
    let mut lines: Vec<String> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Read a log file from disk as a snapshot
///
/// # Returns
/// * `Ok(LoadedSnapshot)` - Line sequence plus content checksum
/// * `Err(SnapshotError)` - File not found, I/O error, or invalid UTF-8
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<LoadedSnapshot, SnapshotError> {
    let content = read_text(&path)?;
    let checksum = blake3::hash(content.as_bytes()).to_hex().to_string();

    Ok(LoadedSnapshot {
        snapshot: LogSnapshot::from_lines(split_lines(&content)),
        checksum,
    })
}

/// Write a snapshot to disk in rendered file form
///
/// A single write per run: callers only reach this point after all
/// per-command processing has finished.
pub fn write_snapshot<P: AsRef<Path>>(path: P, snapshot: &LogSnapshot) -> Result<(), SnapshotError> {
    fs::write(path.as_ref(), snapshot.render())?;
    Ok(())
}
