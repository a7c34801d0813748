use crate::command::{Command, CommandScript};
use crate::snapshot::LogSnapshot;

/// Generate a command script that transforms `source` into `target`
///
/// This is a positional (index-aligned) diff, not a minimal-edit-distance
/// diff: line `i` of the source is compared to line `i` of the target, the
/// target's tail becomes Inserts, and the source's tail becomes Deletes in
/// ascending line order. The trade-off is deliberate: every Insert this
/// generator emits targets a position beyond the shorter snapshot's length,
/// so the applier's "append at end" rule reproduces the target exactly.
/// Any replacement algorithm must keep that tail-only Insert property or
/// the round-trip guarantee breaks.
pub fn generate(source: &LogSnapshot, target: &LogSnapshot) -> CommandScript {
    let src = source.lines();
    let tgt = target.lines();
    let max_len = src.len().max(tgt.len());

    let mut commands = Vec::new();

    for i in 0..max_len {
        let line_number = i + 1;

        if i < src.len() && i < tgt.len() {
            if src[i] != tgt[i] {
                commands.push(Command::Replace {
                    line: line_number,
                    text: tgt[i].clone(),
                });
            }
        } else if i < tgt.len() {
            commands.push(Command::Insert {
                text: tgt[i].clone(),
            });
        } else {
            commands.push(Command::Delete { line: line_number });
        }
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(lines: &[&str]) -> LogSnapshot {
        LogSnapshot::from_lines(lines.iter().copied())
    }

    #[test]
    fn test_identity_diff_is_empty() {
        let a = snapshot(&["[t] INFO start", "[t] WARN slow"]);

        assert!(generate(&a, &a).is_empty());
        assert!(generate(&LogSnapshot::new(), &LogSnapshot::new()).is_empty());
    }

    #[test]
    fn test_replace_then_insert() {
        let script = generate(&snapshot(&["a", "b"]), &snapshot(&["a", "x", "y"]));

        assert_eq!(
            script,
            vec![
                Command::Replace {
                    line: 2,
                    text: "x".to_string(),
                },
                Command::Insert {
                    text: "y".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_source_is_all_inserts() {
        let script = generate(&LogSnapshot::new(), &snapshot(&["a", "b"]));

        assert_eq!(
            script,
            vec![
                Command::Insert {
                    text: "a".to_string(),
                },
                Command::Insert {
                    text: "b".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_empty_target_is_ascending_deletes() {
        let script = generate(&snapshot(&["a", "b", "c"]), &LogSnapshot::new());

        assert_eq!(
            script,
            vec![
                Command::Delete { line: 1 },
                Command::Delete { line: 2 },
                Command::Delete { line: 3 },
            ]
        );
    }

    #[test]
    fn test_shrinking_target_mixes_replaces_and_deletes() {
        let script = generate(&snapshot(&["a", "b", "c", "d"]), &snapshot(&["a", "x"]));

        assert_eq!(
            script,
            vec![
                Command::Replace {
                    line: 2,
                    text: "x".to_string(),
                },
                Command::Delete { line: 3 },
                Command::Delete { line: 4 },
            ]
        );
    }
}
