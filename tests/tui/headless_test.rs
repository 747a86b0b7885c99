//! Integration tests for headless mode.

use crate::common::run_headless;

#[test]
fn test_headless_basic_execution() {
    let (code, stdout, _) = run_headless(&["--events", "key:Esc"]);

    assert_eq!(code, 0, "Expected exit code 0");
    assert!(
        stdout.contains("Events: 1 executed"),
        "Should show events executed"
    );
}

#[test]
fn test_headless_header_shows_mode_and_theme() {
    let (code, stdout, _) = run_headless(&["--events", "assert:contains:text/x-mysql | cobalt"]);

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("sqlformula"));
}

#[test]
fn test_headless_type_event() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT 1",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains(r#""value": "SELECT 1""#));
}

#[test]
fn test_headless_initial_value() {
    let (code, stdout, _) = run_headless(&[
        "--value",
        "SELECT name FROM users",
        "--events",
        "assert:contains:SELECT name FROM users",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_table_hints_open_on_typing() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT * FROM us,assert:state:hint_visible=true,assert:state:hint_items=users,assert:contains:users",
        "--output",
        "json",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains(r#""passed": 3"#));
    assert!(stdout.contains(r#""failed": 0"#));
}

#[test]
fn test_headless_single_candidate_is_not_auto_picked() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT * FROM us,key:Esc,assert:state:hint_visible=false,key:Tab,assert:state:hint_visible=true,assert:state:value=SELECT * FROM us,key:Enter,assert:state:value=SELECT * FROM users",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_props_change_remounts() {
    let (code, stdout, _) = run_headless(&[
        "--value",
        "SELECT 1",
        "--events",
        "assert:state:mount_count=1,props:SELECT 2,assert:state:value=SELECT 2,assert:state:remount_count=1,props:SELECT 2,assert:state:remount_count=1",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_unmount_releases_editor() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "unmount,assert:state:mounted=false,assert:contains:editor unmounted,mount,assert:state:listener_count=2",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_assertion_failure() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT,assert:contains:nonexistent",
    ]);

    assert_eq!(code, 1, "Expected exit code 1 on assertion failure");
    assert!(stdout.contains("1 failed"));
    assert!(stdout.contains("FAILED assert:contains:nonexistent"));
}

#[test]
fn test_headless_frames_output() {
    let (code, stdout, _) = run_headless(&[
        "--events",
        "type:SELECT,key:Enter",
        "--output",
        "frames",
    ]);

    assert_eq!(code, 0);
    assert!(stdout.contains("=== FRAME 0 (initial) ==="));
    assert!(stdout.contains("=== FRAME 1 (type:SELECT) ==="));
    assert!(stdout.contains("=== FRAME 2 (key:Enter) ==="));
}

#[test]
fn test_headless_custom_size() {
    let (code, stdout, _) = run_headless(&[
        "--size",
        "40x10",
        "--events",
        "assert:contains:sqlformula",
    ]);

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_headless_requires_events() {
    let (code, _, stderr) = run_headless(&[]);

    assert_eq!(code, 1);
    assert!(stderr.contains("--headless requires --events or --script"));
}

#[test]
fn test_headless_invalid_event() {
    let (code, _, stderr) = run_headless(&["--events", "wait:100"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown event type"));
}

#[test]
fn test_headless_unknown_mode_fails() {
    let (code, _, stderr) = run_headless(&[
        "--mode",
        "text/x-cobol",
        "--events",
        "key:Esc",
    ]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Construction Error"), "stderr: {stderr}");
}

#[test]
fn test_headless_script_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.txt");
    std::fs::write(
        &script,
        "# complete a column\ntype:SELECT users.sc\nassert:state:hint_items=score\nkey:Enter\nassert:state:value=SELECT users.score\n",
    )
    .unwrap();

    let (code, stdout, _) = run_headless(&["--script", script.to_str().unwrap()]);

    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("Assertions: 2 passed, 0 failed"));
}
