use std::process::Command;
use std::fs;
use std::path::PathBuf;
use std::env;

/// Get the path to the logoscope binary
fn bin_path() -> PathBuf {
    // During tests, CARGO_BIN_EXE_logoscope provides the path to the binary
    // If not available (e.g., running outside cargo), use a relative path
    if let Ok(path) = env::var("CARGO_BIN_EXE_logoscope") {
        PathBuf::from(path)
    } else {
        // Fallback for manual testing - build the binary first
        let _ = Command::new("cargo")
            .args(["build", "--quiet"])
            .status()
            .expect("Failed to build binary");

        let paths = vec![
            PathBuf::from("target/debug/logoscope"),
            PathBuf::from("../target/debug/logoscope"),
        ];

        paths
            .into_iter()
            .find(|p| p.exists())
            .expect("Could not find logoscope binary. Please run 'cargo build' first.")
    }
}

/// Get the path to the fixtures directory
fn fixtures_dir() -> PathBuf {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        PathBuf::from(manifest_dir).join("tests/fixtures")
    } else {
        PathBuf::from("tests/fixtures")
    }
}

/// Unique temp path per test so parallel tests don't collide
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("logoscope_{}_{}", std::process::id(), name))
}

const EXPECTED_PROCESSED: &str = "\
[2024-01-15 09:00:00] INFO Server started
[2024-01-15 09:01:12] INFO User 'alice' logged in
[2024-01-15 09:02:30] ERROR Database timeout
[2024-01-15 09:03:45] INFO User 'bob' logged in
[2024-01-15 09:06:00] INFO User 'alice' logged in
";

#[test]
fn test_apply_end_to_end() {
    let processed = temp_path("apply_processed.txt");

    let output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--commands")
        .arg(fixtures_dir().join("commands.txt"))
        .arg("--processed")
        .arg(&processed)
        .output()
        .expect("Failed to execute binary");

    assert!(
        output.status.success(),
        "Binary failed: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Reading 5 lines from the log file."), "Unexpected output: {}", stdout);
    assert!(stdout.contains("Found 4 commands to process."), "Unexpected output: {}", stdout);
    assert!(
        stdout.contains("Replaced 1 lines, removed 1, added 1."),
        "Unexpected output: {}",
        stdout
    );
    assert!(
        stdout.contains("Total commands skipped due to errors: 2"),
        "Unexpected output: {}",
        stdout
    );

    // Out-of-range and unparseable commands surface as warnings
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 99"), "Missing out-of-range warning: {}", stderr);
    assert!(stderr.contains("DELETE oops"), "Missing parse warning: {}", stderr);

    let content = fs::read_to_string(&processed).expect("Processed file not written");
    assert_eq!(content, EXPECTED_PROCESSED);

    fs::remove_file(&processed).unwrap();
}

#[test]
fn test_apply_levels_summary_to_file() {
    let processed = temp_path("levels_processed.txt");
    let summary = temp_path("levels_summary.txt");

    let output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--commands")
        .arg(fixtures_dir().join("commands.txt"))
        .arg("--processed")
        .arg(&processed)
        .arg("--summary")
        .arg("levels")
        .arg("--output")
        .arg(&summary)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let report = fs::read_to_string(&summary).expect("Summary file not written");
    assert_eq!(report, "INFO: 4\nERROR: 1\nWARN: 0\n");

    fs::remove_file(&processed).unwrap();
    fs::remove_file(&summary).unwrap();
}

#[test]
fn test_apply_logins_summary_to_stdout() {
    let processed = temp_path("logins_processed.txt");

    let output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--commands")
        .arg(fixtures_dir().join("commands.txt"))
        .arg("--processed")
        .arg(&processed)
        .arg("--summary")
        .arg("logins")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    // The inserted line adds a second alice login
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("User Login Counts:"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("alice: 2"), "Unexpected output: {}", stdout);
    assert!(stdout.contains("bob: 1"), "Unexpected output: {}", stdout);

    fs::remove_file(&processed).unwrap();
}

#[test]
fn test_apply_json_report() {
    let processed = temp_path("json_processed.txt");

    let output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--commands")
        .arg(fixtures_dir().join("commands.txt"))
        .arg("--processed")
        .arg(&processed)
        .arg("--json")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output is not valid JSON");

    assert_eq!(report["success"], true);
    assert_eq!(report["replaced"], 1);
    assert_eq!(report["deleted"], 1);
    assert_eq!(report["inserted"], 1);
    assert_eq!(report["skipped"], 2);
    assert!(report["run_id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_ne!(report["source_checksum"], report["result_checksum"]);

    fs::remove_file(&processed).unwrap();
}

#[test]
fn test_apply_missing_log_file_is_fatal() {
    let processed = temp_path("missing_processed.txt");

    let output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg("/nonexistent/log.txt")
        .arg("--commands")
        .arg(fixtures_dir().join("commands.txt"))
        .arg("--processed")
        .arg(&processed)
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success(), "Binary should have failed on a missing input");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File not found"), "Expected fatal error, got: {}", stderr);

    // A failed run never leaves a partially written processed file
    assert!(!processed.exists());
}

#[test]
fn test_diff_writes_command_file() {
    let commands = temp_path("diff_commands.txt");

    let output = Command::new(bin_path())
        .arg("diff")
        .arg("--original")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--modified")
        .arg(fixtures_dir().join("modified_log.txt"))
        .arg("--output")
        .arg(&commands)
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Analysis complete. Found 2 differences."),
        "Unexpected output: {}",
        stdout
    );

    let script = fs::read_to_string(&commands).expect("Command file not written");
    assert_eq!(
        script,
        "REPLACE 3 \"[2024-01-15 09:02:30] ERROR Database timeout\"\nDELETE 5\n"
    );

    fs::remove_file(&commands).unwrap();
}

#[test]
fn test_diff_json_report() {
    let output = Command::new(bin_path())
        .arg("diff")
        .arg("--original")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--modified")
        .arg(fixtures_dir().join("modified_log.txt"))
        .arg("--json")
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value =
        serde_json::from_str(&stdout).expect("Output is not valid JSON");

    assert_eq!(report["success"], true);
    assert_eq!(report["command_count"], 2);
    assert_eq!(report["replacements"], 1);
    assert_eq!(report["insertions"], 0);
    assert_eq!(report["deletions"], 1);
}

#[test]
fn test_diff_identical_files_is_empty() {
    let output = Command::new(bin_path())
        .arg("diff")
        .arg("--original")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--modified")
        .arg(fixtures_dir().join("sample_log.txt"))
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 0 differences."), "Unexpected output: {}", stdout);
}

#[test]
fn test_diff_then_apply_round_trips() {
    let commands = temp_path("roundtrip_commands.txt");
    let processed = temp_path("roundtrip_processed.txt");

    let diff_output = Command::new(bin_path())
        .arg("diff")
        .arg("--original")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--modified")
        .arg(fixtures_dir().join("modified_log.txt"))
        .arg("--output")
        .arg(&commands)
        .output()
        .expect("Failed to execute binary");
    assert!(diff_output.status.success());

    let apply_output = Command::new(bin_path())
        .arg("apply")
        .arg("--log")
        .arg(fixtures_dir().join("sample_log.txt"))
        .arg("--commands")
        .arg(&commands)
        .arg("--processed")
        .arg(&processed)
        .output()
        .expect("Failed to execute binary");
    assert!(apply_output.status.success());

    // The serialized script quotes payloads and the parser keeps the quotes,
    // so the textual round trip carries them into the replaced line
    let processed_content = fs::read_to_string(&processed).unwrap();
    assert!(
        processed_content.contains("ERROR Database timeout"),
        "Replace did not land: {}",
        processed_content
    );
    assert!(
        !processed_content.contains("Connection lost"),
        "Delete did not land: {}",
        processed_content
    );

    fs::remove_file(&commands).unwrap();
    fs::remove_file(&processed).unwrap();
}
