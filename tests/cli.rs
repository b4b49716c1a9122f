use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

fn head(dir: &Path) -> String {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(dir)
        .output()
        .expect("run git");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit(dir: &Path, message: &str) -> String {
    fs::write(dir.join(format!("{message}.txt")), message).unwrap();
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", message]);
    head(dir)
}

fn make_repo(dir: &Path) -> String {
    fs::create_dir_all(dir).unwrap();
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    commit(dir, "initial")
}

fn run(args: &[&str]) -> (bool, String, String) {
    let output = cargo_bin_cmd!("ws-lock").args(args).output().unwrap();
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn capture_then_restore_round_trip() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();
    let h1 = make_repo(&ws.join("A"));
    let h2 = make_repo(&ws.join("B"));
    let h3 = make_repo(&ws.join("C"));
    let ws_arg = ws.to_str().unwrap();
    let anchor = ws.join("A");
    let anchor_arg = anchor.to_str().unwrap();

    let (ok, stdout, stderr) = run(&["capture", "--workspace", ws_arg, "--repo", anchor_arg]);
    assert!(ok, "capture failed: {stderr}");
    assert!(stdout.contains(anchor_arg), "confirmation missing anchor: {stdout}");

    let yaml = fs::read_to_string(anchor.join(".git").join("ws-lock.yaml")).unwrap();
    assert!(yaml.contains(&format!("commit-hash: {h1}")), "{yaml}");
    assert!(yaml.contains(&format!("commit-hash: {h2}")), "{yaml}");
    assert!(yaml.contains(&format!("commit-hash: {h3}")), "{yaml}");

    for name in ["A", "B", "C"] {
        commit(&ws.join(name), "later");
    }

    let (ok, stdout, stderr) = run(&["restore", "--workspace", ws_arg, "--repo", anchor_arg]);
    assert!(ok, "restore failed: {stderr}");
    assert!(stdout.contains("Checking out"), "{stdout}");
    assert!(stdout.contains("3 checked out"), "{stdout}");

    assert_eq!(head(&ws.join("A")), h1);
    assert_eq!(head(&ws.join("B")), h2);
    assert_eq!(head(&ws.join("C")), h3);
}

#[test]
fn update_and_apply_aliases_are_accepted() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();
    make_repo(&ws.join("app"));
    let ws_arg = ws.to_str().unwrap();
    let anchor = ws.join("app");

    let (ok, _, stderr) = run(&["update", "--workspace", ws_arg, "--repo", anchor.to_str().unwrap()]);
    assert!(ok, "{stderr}");
    let (ok, _, stderr) = run(&["apply", "--workspace", ws_arg, "--repo", anchor.to_str().unwrap()]);
    assert!(ok, "{stderr}");
}

#[test]
fn restore_without_snapshot_exits_with_error() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();
    make_repo(&ws.join("app"));
    let anchor = ws.join("app");

    let (ok, _, stderr) = run(&[
        "restore",
        "--workspace",
        ws.to_str().unwrap(),
        "--repo",
        anchor.to_str().unwrap(),
    ]);
    assert!(!ok);
    assert!(stderr.contains("No snapshot recorded"), "{stderr}");
}

#[test]
fn missing_workspace_is_rejected() {
    let temp = TempDir::new().unwrap();
    make_repo(&temp.path().join("app"));
    let missing = temp.path().join("missing");

    let (ok, _, stderr) = run(&[
        "capture",
        "--workspace",
        missing.to_str().unwrap(),
        "--repo",
        temp.path().join("app").to_str().unwrap(),
    ]);
    assert!(!ok);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn both_flags_are_required() {
    let (ok, _, stderr) = run(&["capture", "--workspace", "."]);
    assert!(!ok);
    assert!(stderr.contains("--repo"), "{stderr}");
}

#[test]
fn restore_json_report() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path();
    make_repo(&ws.join("app"));
    make_repo(&ws.join("lib"));
    let ws_arg = ws.to_str().unwrap();
    let anchor = ws.join("app");
    let anchor_arg = anchor.to_str().unwrap();

    let (ok, _, stderr) = run(&["capture", "--workspace", ws_arg, "--repo", anchor_arg]);
    assert!(ok, "{stderr}");

    let (ok, stdout, stderr) = run(&[
        "restore",
        "--workspace",
        ws_arg,
        "--repo",
        anchor_arg,
        "--dry-run",
        "--json",
    ]);
    assert!(ok, "{stderr}");
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("json report");
    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|e| e["outcome"] == "would-check-out"));
}
