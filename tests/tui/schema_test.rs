//! Schema printing and schema loaded from the config file.

use crate::common::run_sqlformula;
use std::process::Command;

#[test]
fn test_print_builtin_schema() {
    let (code, stdout, _) = run_sqlformula(&["--print-schema"]);

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "users (name, score, birthDate)\ncountries (name, population, size)\nscore (zooao)\n"
    );
}

fn run_with_config(config: &str, args: &[&str]) -> (i32, String, String) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, config).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_sqlformula"))
        .arg("--config")
        .arg(&path)
        .args(args)
        .env_remove("SQLFORMULA_MODE")
        .env_remove("SQLFORMULA_THEME")
        .output()
        .expect("Failed to execute command");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn test_schema_from_config() {
    let config = r#"
[schema]
orders = ["id", "total"]
"#;
    let (code, stdout, _) = run_with_config(config, &["--print-schema"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "orders (id, total)\n");
}

#[test]
fn test_config_schema_drives_hints() {
    let config = r#"
[editor]
theme = "blackboard"

[schema]
orders = ["id", "total"]
"#;
    let (code, stdout, _) = run_with_config(
        config,
        &[
            "--headless",
            "--events",
            "type:SELECT * FROM or,assert:state:hint_items=orders,assert:contains:blackboard",
        ],
    );

    assert_eq!(code, 0, "stdout: {stdout}");
}

#[test]
fn test_invalid_config_is_reported() {
    let (code, _, stderr) = run_with_config("[editor\nmode = 1", &["--print-schema"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Configuration"), "stderr: {stderr}");
}

#[test]
fn test_mode_flag_overrides_config() {
    let config = r#"
[editor]
mode = "text/x-mysql"
"#;
    let (code, stdout, _) = run_with_config(
        config,
        &[
            "--mode",
            "text/x-pgsql",
            "--headless",
            "--events",
            "assert:contains:text/x-pgsql",
        ],
    );

    assert_eq!(code, 0, "stdout: {stdout}");
}
