//! End-to-end tests for the wkmp-em binary

use serde_json::{json, Value};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str], config: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wkmp-em"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run wkmp-em")
}

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_cli_prints_merged_entity() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "wkmp-em.toml", "[logging]\nlevel = \"warn\"\n");
    let input = write(
        &dir,
        "fragments.json",
        r#"[
            {"albumRelease": {"id": 1, "primaryArtists": [7]}},
            {"artist": {"id": 7, "name": "Coltrane"}}
        ]"#,
    );

    let output = run(&[input.as_str()], Path::new(&config));
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let entity: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entity, json!({"id": 1, "primaryArtists": [{"id": 7, "name": "Coltrane"}]}));
}

#[test]
fn test_cli_strict_flag_reports_missing_root() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "wkmp-em.toml", "");
    let input = write(&dir, "fragments.json", r#"[{"artist": {"id": 7}}]"#);

    let lenient = run(&[input.as_str()], Path::new(&config));
    assert!(lenient.status.success());
    assert_eq!(String::from_utf8_lossy(&lenient.stdout).trim(), "null");

    let strict = run(&["--strict", input.as_str()], Path::new(&config));
    assert!(!strict.status.success());
    assert!(String::from_utf8_lossy(&strict.stderr).contains("No root fragment found"));
}

#[test]
fn test_cli_rejects_unknown_kind() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "wkmp-em.toml", "");
    let input = write(&dir, "fragments.json", r#"[{"playlist": {"id": 1}}]"#);

    let output = run(&["--kind", "playlist", input.as_str()], Path::new(&config));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported entity kind"));
}

#[test]
fn test_cli_warns_about_missing_config_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.toml");
    let input = write(&dir, "fragments.json", r#"[{"albumRelease": {"id": 1}}]"#);

    let output = run(&[input.as_str()], &missing);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"), "stderr: {}", stderr);
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), r#"{"id":1}"#);
}
