/// A single edit command against a log snapshot
///
/// Line numbers are 1-based and always refer to the snapshot as it existed
/// before the whole script is applied; applying a Delete does not renumber
/// the targets of later commands in the same script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the text of a line, keeping its timestamp prefix
    Replace { line: usize, text: String },
    /// Append a line to the end of the snapshot
    Insert { text: String },
    /// Remove a line
    Delete { line: usize },
}

/// An ordered sequence of edit commands
pub type CommandScript = Vec<Command>;

/// Outcome of parsing one line of a command file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Line parsed into a command
    Command(Command),
    /// Recognized verb but the rest of the line failed to parse
    Skipped {
        /// Reason for skipping
        reason: String,
    },
    /// Blank line or unrecognized verb, not counted as an error
    Ignored,
}

/// Parse one line of a command file
///
/// Grammar:
/// * `REPLACE <n> <text>` - at most 3 whitespace-separated tokens; `<text>`
///   is the remainder after the first two, trimmed.
/// * `DELETE <n>`
/// * `INSERT <text>` - `<text>` is everything after the literal `INSERT `
///   prefix, verbatim. A bare `INSERT` inserts an empty line.
///
/// Unrecognized verbs and blank lines are ignored silently; only lines that
/// start with a recognized verb but fail further parsing are skipped.
pub fn parse_line(raw: &str) -> ParseOutcome {
    let line = raw.trim();

    if line.is_empty() {
        return ParseOutcome::Ignored;
    }

    if let Some(text) = line.strip_prefix("INSERT ") {
        return ParseOutcome::Command(Command::Insert {
            text: text.to_string(),
        });
    }
    if line == "INSERT" {
        // No payload after the verb: inherited behavior is an empty line
        return ParseOutcome::Command(Command::Insert {
            text: String::new(),
        });
    }

    if line.starts_with("REPLACE") {
        let mut parts = line.splitn(3, char::is_whitespace);
        let _verb = parts.next();
        let number = parts.next();
        let text = parts.next();

        let (Some(number), Some(text)) = (number, text) else {
            return ParseOutcome::Skipped {
                reason: format!("malformed command: {}", line),
            };
        };

        return match number.parse::<usize>() {
            Ok(n) => ParseOutcome::Command(Command::Replace {
                line: n,
                text: text.trim().to_string(),
            }),
            Err(_) => ParseOutcome::Skipped {
                reason: format!("unparseable line number in command: {}", line),
            },
        };
    }

    if line.starts_with("DELETE") {
        let number = line.split_whitespace().nth(1);

        let Some(number) = number else {
            return ParseOutcome::Skipped {
                reason: format!("malformed command: {}", line),
            };
        };

        return match number.parse::<usize>() {
            Ok(n) => ParseOutcome::Command(Command::Delete { line: n }),
            Err(_) => ParseOutcome::Skipped {
                reason: format!("unparseable line number in command: {}", line),
            },
        };
    }

    ParseOutcome::Ignored
}

/// Serialize a command into its canonical textual form
///
/// Replace and Insert payloads are double-quoted; Delete's argument is not.
pub fn serialize(cmd: &Command) -> String {
    match cmd {
        Command::Replace { line, text } => format!("REPLACE {} \"{}\"", line, text),
        Command::Insert { text } => format!("INSERT \"{}\"", text),
        Command::Delete { line } => format!("DELETE {}", line),
    }
}

/// Serialize a whole script in file form
///
/// Commands are newline-joined with a trailing newline; an empty script
/// serializes as the empty string.
pub fn serialize_script(script: &[Command]) -> String {
    if script.is_empty() {
        String::new()
    } else {
        let mut text = script
            .iter()
            .map(serialize)
            .collect::<Vec<String>>()
            .join("\n");
        text.push('\n');
        text
    }
}

/// Result of parsing a whole command file
#[derive(Debug, Clone, Default)]
pub struct ParsedScript {
    /// Successfully parsed commands, in file order
    pub commands: CommandScript,
    /// Number of lines skipped due to parse failures
    pub skipped: usize,
    /// One warning per skipped line, carrying the raw command text
    pub warnings: Vec<String>,
}

/// Parse a command file into a script
///
/// Per-line failures never abort the parse; they are counted and surfaced
/// as warnings.
pub fn parse_script(content: &str) -> ParsedScript {
    let mut parsed = ParsedScript::default();

    for line in content.lines() {
        match parse_line(line) {
            ParseOutcome::Command(cmd) => parsed.commands.push(cmd),
            ParseOutcome::Skipped { reason } => {
                parsed.skipped += 1;
                parsed.warnings.push(reason);
            }
            ParseOutcome::Ignored => {}
        }
    }

    parsed
}
