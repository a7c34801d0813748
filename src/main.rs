use clap::{Parser, Subcommand, ValueEnum};
use logoscope::{
    json::{ApplyReport, DiffReport, generate_run_id},
    read_snapshot, read_text,
};
use std::fs;
use std::process;

/// Line-oriented log maintenance tool
#[derive(Parser, Debug)]
#[command(name = "logoscope")]
#[command(version = "0.1.0")]
#[command(about = "Patch, diff, and summarize line-oriented log files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Apply a command script to a log file
    Apply {
        /// Log file to process
        #[arg(short, long)]
        log: String,

        /// Command file with REPLACE/INSERT/DELETE lines
        #[arg(short, long)]
        commands: String,

        /// Where to write the processed log
        #[arg(short, long)]
        processed: String,

        /// Summary to compute over the processed log
        #[arg(short, long, value_enum)]
        summary: Option<SummaryKind>,

        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output a structured JSON report instead of progress text
        #[arg(short, long)]
        json: bool,
    },
    /// Compare two log files and emit the command script that transforms
    /// the first into the second
    Diff {
        /// Original log file
        #[arg(long)]
        original: String,

        /// Modified log file
        #[arg(long)]
        modified: String,

        /// Write the command script to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output a structured JSON report instead of the script
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SummaryKind {
    /// Count INFO/ERROR/WARN lines
    Levels,
    /// Count login events per user
    Logins,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Apply {
            log,
            commands,
            processed,
            summary,
            output,
            json,
        } => run_apply(&log, &commands, &processed, summary, output.as_deref(), json),
        CliCommand::Diff {
            original,
            modified,
            output,
            json,
        } => run_diff(&original, &modified, output.as_deref(), json),
    }
}

fn run_apply(
    log_path: &str,
    command_path: &str,
    processed_path: &str,
    summary: Option<SummaryKind>,
    output_path: Option<&str>,
    json_mode: bool,
) {
    let run_id = generate_run_id();

    // Both inputs must load before anything is written
    let loaded = match read_snapshot(log_path) {
        Ok(loaded) => loaded,
        Err(e) => apply_abort(
            run_id,
            format!("Failed to read log file '{}': {}", log_path, e),
            json_mode,
        ),
    };
    let command_text = match read_text(command_path) {
        Ok(text) => text,
        Err(e) => apply_abort(
            run_id,
            format!("Failed to read command file '{}': {}", command_path, e),
            json_mode,
        ),
    };

    if !json_mode {
        println!("Reading {} lines from the log file.", loaded.snapshot.len());
    }

    let parsed = logoscope::parse_script(&command_text);
    if !json_mode {
        println!("Found {} commands to process.", parsed.commands.len());
    }

    let outcome = logoscope::apply(&loaded.snapshot, &parsed.commands);

    // Per-command problems are warnings, never aborts
    for warning in parsed.warnings.iter().chain(outcome.warnings.iter()) {
        eprintln!("Warning: {}", warning);
    }

    if let Err(e) = logoscope::write_snapshot(processed_path, &outcome.result) {
        apply_abort(
            run_id,
            format!("Failed to write processed log '{}': {}", processed_path, e),
            json_mode,
        );
    }

    if let Some(kind) = summary {
        let report = match kind {
            SummaryKind::Levels => logoscope::count_log_levels(&outcome.result).render(),
            SummaryKind::Logins => {
                logoscope::render_login_report(&logoscope::count_user_logins(&outcome.result))
            }
        };

        match output_path {
            Some(path) => {
                if let Err(e) = fs::write(path, &report) {
                    eprintln!("Failed to write summary to '{}': {}", path, e);
                    process::exit(1);
                }
            }
            None if !json_mode => print!("{}", report),
            None => {}
        }
    }

    if json_mode {
        let warnings: Vec<String> = parsed
            .warnings
            .iter()
            .chain(outcome.warnings.iter())
            .cloned()
            .collect();
        let report = ApplyReport::success(
            run_id,
            loaded.checksum,
            outcome.result.checksum(),
            outcome.stats,
            parsed.skipped,
            warnings,
        );
        print_json(&report);
    } else {
        let stats = outcome.stats;
        println!(
            "Processing complete. Replaced {} lines, removed {}, added {}.",
            stats.replaced, stats.deleted, stats.inserted
        );
        let skipped = stats.skipped + parsed.skipped;
        if skipped > 0 {
            println!("Total commands skipped due to errors: {}", skipped);
        }
    }
}

fn run_diff(original_path: &str, modified_path: &str, output_path: Option<&str>, json_mode: bool) {
    let run_id = generate_run_id();

    let original = match read_snapshot(original_path) {
        Ok(loaded) => loaded,
        Err(e) => diff_abort(
            run_id,
            format!("Failed to read log file '{}': {}", original_path, e),
            json_mode,
        ),
    };
    let modified = match read_snapshot(modified_path) {
        Ok(loaded) => loaded,
        Err(e) => diff_abort(
            run_id,
            format!("Failed to read log file '{}': {}", modified_path, e),
            json_mode,
        ),
    };

    if !json_mode {
        println!(
            "Comparing '{}' ({} lines) with '{}' ({} lines).",
            original_path,
            original.snapshot.len(),
            modified_path,
            modified.snapshot.len()
        );
    }

    let script = logoscope::generate(&original.snapshot, &modified.snapshot);
    let script_text = logoscope::serialize_script(&script);

    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &script_text) {
            diff_abort(
                run_id,
                format!("Failed to write command file '{}': {}", path, e),
                json_mode,
            );
        }
    }

    if json_mode {
        let replacements = script
            .iter()
            .filter(|c| matches!(c, logoscope::Command::Replace { .. }))
            .count();
        let insertions = script
            .iter()
            .filter(|c| matches!(c, logoscope::Command::Insert { .. }))
            .count();
        let deletions = script
            .iter()
            .filter(|c| matches!(c, logoscope::Command::Delete { .. }))
            .count();
        print_json(&DiffReport::success(
            run_id,
            replacements,
            insertions,
            deletions,
        ));
    } else {
        if output_path.is_none() {
            print!("{}", script_text);
        }
        println!("Analysis complete. Found {} differences.", script.len());
    }
}

/// Report a fatal apply error and exit before any output is written
fn apply_abort(run_id: String, error: String, json_mode: bool) -> ! {
    if json_mode {
        print_json(&ApplyReport::failure(run_id, error.clone()));
    }
    eprintln!("Error: {}", error);
    process::exit(1);
}

/// Report a fatal diff error and exit before any output is written
fn diff_abort(run_id: String, error: String, json_mode: bool) -> ! {
    if json_mode {
        print_json(&DiffReport::failure(run_id, error.clone()));
    }
    eprintln!("Error: {}", error);
    process::exit(1);
}

fn print_json<T: serde::Serialize>(report: &T) {
    let output = serde_json::to_string_pretty(report)
        .unwrap_or_else(|_| r#"{"error": "Failed to serialize report"}"#.to_string());
    println!("{}", output);
}
