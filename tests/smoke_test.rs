/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn canopy(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute cargo run")
}

#[test]
fn binary_shows_help() {
    let output = canopy(&["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("canopy"), "Help output should mention canopy");
    assert!(stdout.contains("grove"), "Help output should list the grove command");
}

#[test]
fn binary_shows_version() {
    let output = canopy(&["--version"]);

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = canopy(&["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn print_renders_requested_size() {
    let output = canopy(&["print", "--seed", "7", "--width", "30", "--height", "12"]);

    assert!(
        output.status.success(),
        "print failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 12);
    assert!(stdout.contains('▀'));
}

#[test]
fn print_rejects_bad_branch_factor() {
    let output = canopy(&["print", "--branch-factor", "3", "--width", "10", "--height", "5"]);

    assert!(!output.status.success(), "branch factor above 1 should be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"));
}
