use assert_cmd::Command;
use predicates::str::{contains, starts_with};
use tempfile::TempDir;

fn agentdeck(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentdeck"));
    cmd.env("AGENTDECK_DIR", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env_remove("AGENTDECK_DB_PATH")
        .env_remove("RUST_LOG")
        .arg("--db-path")
        .arg(home.path().join("test.db"));
    cmd
}

fn created_id(home: &TempDir, kind: &str, name: &str) -> String {
    let output = agentdeck(home)
        .args(["--format", "json", "create", kind, name])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["id"].as_str().unwrap().to_string()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentdeck"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("AgentDeck"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentdeck"));
    cmd.arg("--version").assert().success();
}

#[test]
fn test_cli_completions() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentdeck"));
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(starts_with("_agentdeck"));
}

#[test]
fn test_create_then_list() {
    let home = TempDir::new().unwrap();

    agentdeck(&home)
        .args(["create", "agents", "Bot One"])
        .assert()
        .success()
        .stdout(contains("Bot One created successfully"));

    agentdeck(&home)
        .args(["list", "--type", "agents"])
        .assert()
        .success()
        .stdout(contains("Bot One"));

    agentdeck(&home)
        .args(["list", "--search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(contains("No resources found."));
}

#[test]
fn test_duplicate_name_fails_with_exit_code() {
    let home = TempDir::new().unwrap();
    created_id(&home, "agents", "Bot One");

    agentdeck(&home)
        .args(["create", "skills", "bot one"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("already exists"));
}

#[test]
fn test_update_show_and_delete() {
    let home = TempDir::new().unwrap();
    let id = created_id(&home, "skills", "Review");

    agentdeck(&home)
        .args(["update", &id, "--name", "Code Review", "--content", "Check diffs."])
        .assert()
        .success()
        .stdout(contains("Changes saved"));

    agentdeck(&home)
        .args(["show", &id])
        .assert()
        .success()
        .stdout(contains("Code Review"))
        .stdout(contains("Check diffs."));

    agentdeck(&home)
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(contains("Resource deleted"));

    agentdeck(&home)
        .args(["show", &id])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn test_folders_json() {
    let home = TempDir::new().unwrap();
    created_id(&home, "mcp_servers", "GitHub");

    let output = agentdeck(&home)
        .args(["--format", "json", "folders"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let folders = value["folders"].as_array().unwrap();
    assert_eq!(folders.len(), 6);
    assert_eq!(folders[3]["label"], "MCP Servers");
    assert_eq!(folders[3]["count"], 1);
}

#[test]
fn test_table_backend_flag() {
    let home = TempDir::new().unwrap();

    agentdeck(&home)
        .args(["--backend", "table", "create", "hooks", "pre-commit"])
        .assert()
        .success();

    agentdeck(&home)
        .args(["--backend", "table", "list"])
        .assert()
        .success()
        .stdout(contains("pre-commit"));

    agentdeck(&home)
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("No resources found."));
}
