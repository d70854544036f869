use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn bin_path() -> &'static str {
    env!("CARGO_BIN_EXE_cloudopt")
}

fn run_cmd(home: &TempDir, args: &[&str]) -> Output {
    Command::new(bin_path())
        .args(args)
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("CLOUDHEALTH_API_KEY")
        .env_remove("CLOUDHEALTH_CLIENT_ID")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run cloudopt command")
}

fn config_path(home: &TempDir) -> PathBuf {
    home.path().join("cloudopt").join("config.toml")
}

fn write_config(home: &TempDir, content: &str) {
    let path = config_path(home);
    fs::create_dir_all(path.parent().unwrap()).expect("create config dir");
    fs::write(path, content).expect("write config");
}

#[test]
fn config_init_writes_defaults() {
    let home = TempDir::new().expect("temp home");
    let output = run_cmd(&home, &["config", "init"]);
    assert!(output.status.success());

    let content = fs::read_to_string(config_path(&home)).expect("read config");
    assert!(content.contains("snapshot_cutoff_year = 2021"));
    assert!(content.contains("https://chapi.cloudhealthtech.com"));
}

#[test]
fn config_init_does_not_overwrite() {
    let home = TempDir::new().expect("temp home");
    write_config(&home, "[api]\nclient_id = \"777\"\n");

    let output = run_cmd(&home, &["config", "init"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already exists"));

    let content = fs::read_to_string(config_path(&home)).expect("read config");
    assert!(content.contains("777"));
}

#[test]
fn config_set_then_check() {
    let home = TempDir::new().expect("temp home");
    assert!(run_cmd(&home, &["config", "init"]).status.success());

    let output = run_cmd(&home, &["config", "set", "client_id", "12345"]);
    assert!(output.status.success());
    let output = run_cmd(&home, &["config", "set", "api_key", "tok-abcdef9876"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("****9876"));
    assert!(!stdout.contains("tok-abcdef9876"));

    let output = run_cmd(&home, &["config", "check"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Config is valid"));
    assert!(stdout.contains("Client ID: 12345"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().expect("temp home");
    let output = run_cmd(&home, &["config", "set", "colour", "red"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown config key"));
}

#[test]
fn config_set_rejects_invalid_policy() {
    let home = TempDir::new().expect("temp home");
    let output = run_cmd(&home, &["config", "set", "gp2_savings_ratio", "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gp2_savings_ratio"));
    assert!(!config_path(&home).exists());
}

#[test]
fn config_check_flags_invalid_file() {
    let home = TempDir::new().expect("temp home");
    write_config(&home, "[policy]\ngp2_savings_ratio = 1.5\n");

    let output = run_cmd(&home, &["config", "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gp2_savings_ratio"));
}

#[test]
fn report_without_credentials_fails_with_actionable_message() {
    let home = TempDir::new().expect("temp home");
    let output = run_cmd(&home, &["report"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("valid API token and client ID"));
    assert!(output.stdout.is_empty());
}

#[test]
fn default_command_is_report() {
    let home = TempDir::new().expect("temp home");
    let output = run_cmd(&home, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("valid API token and client ID"));
}

#[test]
fn report_refuses_plain_http_endpoint() {
    let home = TempDir::new().expect("temp home");
    write_config(&home, "[api]\nbase_url = \"http://chapi.example.com\"\n");

    let output = run_cmd(
        &home,
        &["report", "--api-key", "tok", "--client-id", "42", "--json"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must use HTTPS"));
    assert!(output.stdout.is_empty());
}
