//! Integration tests that run the CLI binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn bin() -> Command {
    // CARGO_BIN_EXE_<name> uses the binary target name; hyphens require concat! for env!()
    let bin = env!(concat!("CARGO_BIN_EXE_physics", "-", "tutor"));
    let mut cmd = Command::new(bin);
    cmd.env_remove("GROQ_API_KEY");
    cmd
}

/// Run with `input` on stdin.
fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for binary")
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let output = bin()
        .arg("--help")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--prompt"), "expected usage text in output");
    assert!(stdout.contains("normalize"));
}

#[test]
fn cli_version_succeeds() {
    let output = bin()
        .arg("--version")
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("physics-tutor"));
}

#[test]
fn cli_prompt_without_api_key_exits_with_error() {
    // Run from temp dir so dotenv() won't load .env from project root
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .arg("-p")
        .arg("What is Gauss's law?")
        .current_dir(tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(
        !output.status.success(),
        "expected failure when GROQ_API_KEY is not set"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("GROQ_API_KEY"),
        "expected API key error message, got: {}",
        stderr
    );
}

#[test]
fn cli_missing_context_file_exits_with_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .args(["-p", "hello", "-f", "no-such-notes.md"])
        .current_dir(tmp.path())
        .output()
        .expect("binary not found - run cargo build first");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-notes.md"), "got: {}", stderr);
}

#[test]
fn normalize_stdin_rewrites_delimiters() {
    let mut cmd = bin();
    cmd.arg("normalize");
    let output = run_with_stdin(cmd, r"The field is \(E=kq/r^2\) radial.");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "The field is $E=kq/r^2$ radial."
    );
}

#[test]
fn normalize_theory_strips_math() {
    let mut cmd = bin();
    cmd.args(["normalize", "--theory"]);
    let output = run_with_stdin(cmd, r"Flux equals $$\oint E$$ through the surface.");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Flux equals  through the surface.\n"
    );
}

#[test]
fn normalize_reads_file_argument() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let path = tmp.path().join("answer.md");
    std::fs::write(&path, r"Work is \[W = F d\]").expect("write input");
    let output = bin()
        .arg("normalize")
        .arg(&path)
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Work is $$W = F d$$");
}

#[test]
fn normalize_spans_lists_detected_spans() {
    let mut cmd = bin();
    cmd.args(["normalize", "--spans"]);
    let output = run_with_stdin(cmd, "a $x$ b");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "got: {}", stdout);
    assert!(lines[1].starts_with("InlineMath"));
    assert!(lines[1].contains("Dollar"));
    assert!(lines[1].ends_with(r#""$x$""#));
}

#[test]
fn history_list_empty_data_dir() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin()
        .args(["history", "list"])
        .env("HOME", tmp.path())
        .env("XDG_DATA_HOME", tmp.path().join("data"))
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No saved sessions."));
}

#[test]
fn completions_bash_outputs_script() {
    let output = bin()
        .args(["completions", "bash"])
        .output()
        .expect("binary not found - run cargo build first");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("physics-tutor"));
}
