use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const NOW: &str = "2024-06-01T12:00:00Z";

fn trim(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("trim-cli").unwrap();
    cmd.current_dir(dir).env("TRIM_NOW", NOW).env_remove("TRIM_LOG");
    cmd
}

fn init() -> TempDir {
    let dir = TempDir::new().unwrap();
    trim(dir.path()).arg("init").assert().success();
    dir
}

fn json_out(cmd: &mut Command) -> Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add(dir: &Path, args: &[&str]) -> String {
    let out = json_out(trim(dir).arg("add").args(args));
    out["id"].as_str().unwrap().to_string()
}

fn list_ids(dir: &Path, section: &str) -> Vec<String> {
    let rows = json_out(trim(dir).args(["list", "--section", section]));
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn init_creates_trim_dir() {
    let dir = TempDir::new().unwrap();
    trim(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(".trim"));

    assert!(dir.path().join(".trim").is_dir());
    assert!(dir.path().join(".trim/config.toml").exists());
}

#[test]
fn init_twice_fails() {
    let dir = init();
    trim(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn outside_workspace_fails() {
    let dir = TempDir::new().unwrap();
    trim(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a Trim workspace"));
}

#[test]
fn first_list_shows_examples() {
    let dir = init();
    trim(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("What should I have for lunch?"))
        .stdout(predicate::str::contains("(example)"));
    assert!(dir.path().join(".trim/samples.json").exists());
}

#[test]
fn samples_can_be_disabled() {
    let dir = init();
    std::fs::write(
        dir.path().join(".trim/config.toml"),
        "[samples]\nenabled = false\n",
    )
    .unwrap();
    trim(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No decisions yet"));
}

#[test]
fn add_and_show() {
    let dir = init();
    let id = add(
        dir.path(),
        &["Buy a bike?", "--category", "Money", "--importance", "high"],
    );
    trim(dir.path())
        .args(["show", &id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy a bike?"))
        .stdout(predicate::str::contains("Money"))
        .stdout(predicate::str::contains("high (4320 min)"));
}

#[test]
fn add_rejects_unknown_category() {
    let dir = init();
    trim(dir.path())
        .args(["add", "Paint the fence?", "--category", "Chores"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown category"));
}

#[test]
fn sub_decisions_inherit_category() {
    let dir = init();
    let parent = add(dir.path(), &["Plan the trip", "--category", "Work"]);
    let child = add(dir.path(), &["Which hotel?", "--parent", &parent]);

    let shown = json_out(trim(dir.path()).args(["show", &child]));
    assert_eq!(shown["decision"]["category"], "Work");
    assert_eq!(shown["decision"]["importance"], "LOW");
    assert_eq!(shown["path"][0], parent.as_str());

    trim(dir.path())
        .args(["show", &parent])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sub-decisions:"))
        .stdout(predicate::str::contains("Which hotel?"));
}

#[test]
fn trim_needs_a_selection() {
    let dir = init();
    let id = add(dir.path(), &["Take the job?", "--mode", "do_or_not"]);
    trim(dir.path())
        .args(["trim", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no selected option"));

    trim(dir.path())
        .args(["option", "select", &id, "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Do it"));
    trim(dir.path())
        .args(["trim", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Do it"));

    assert!(list_ids(dir.path(), "resolved").contains(&id));
    assert!(!list_ids(dir.path(), "active").contains(&id));

    trim(dir.path()).args(["reopen", &id]).assert().success();
    assert!(list_ids(dir.path(), "active").contains(&id));
}

#[test]
fn past_deadline_moves_to_overdue() {
    let dir = init();
    let id = add(dir.path(), &["Renew passport?"]);
    trim(dir.path())
        .args(["edit", &id, "--deadline", "2024-06-01T11:00:00Z"])
        .assert()
        .success();
    assert!(list_ids(dir.path(), "overdue").contains(&id));

    trim(dir.path())
        .args(["edit", &id, "--deadline", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid deadline"));
}

#[test]
fn mode_switch_keeps_option_content() {
    let dir = init();
    let id = add(dir.path(), &["Morning drink"]);
    trim(dir.path())
        .args(["option", "edit", &id, "1", "--title", "Coffee", "--pro", "Strong"])
        .assert()
        .success();
    trim(dir.path())
        .args(["mode", &id, "no-clear-options"])
        .assert()
        .success();
    trim(dir.path())
        .args(["mode", &id, "do_or_not"])
        .assert()
        .success();
    trim(dir.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Don't do it"));
    trim(dir.path())
        .args(["mode", &id, "choose_best"])
        .assert()
        .success();
    trim(dir.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("+ Strong"));
}

#[test]
fn deleted_sample_stays_deleted() {
    let dir = init();
    trim(dir.path())
        .args(["delete", "sample-move"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 sub-decision(s)"));

    trim(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("new apartment").not());
    trim(dir.path())
        .args(["samples", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sample-move"));

    trim(dir.path())
        .args(["samples", "sync", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Force-synced"));
    trim(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("new apartment"));
}

#[test]
fn editing_a_sample_makes_it_yours() {
    let dir = init();
    trim(dir.path())
        .args(["edit", "sample-gym", "--title", "Join the climbing gym?"])
        .assert()
        .success();
    let shown = json_out(trim(dir.path()).args(["show", "sample-gym"]));
    assert_eq!(shown["decision"]["title"], "Join the climbing gym?");
    assert!(shown["decision"].get("isExample").is_none());
}

#[test]
fn move_rejects_cycles() {
    let dir = init();
    let parent = add(dir.path(), &["Parent"]);
    let child = add(dir.path(), &["Child", "--parent", &parent]);
    trim(dir.path())
        .args(["move", &parent, "--parent", &child])
        .assert()
        .failure()
        .stderr(predicate::str::contains("descendants"));
    trim(dir.path())
        .args(["move", &child, "--root"])
        .assert()
        .success()
        .stdout(predicate::str::contains("top level"));
}

#[test]
fn reorder_children() {
    let dir = init();
    let parent = add(dir.path(), &["Parent"]);
    let a = add(dir.path(), &["A", "--parent", &parent]);
    let b = add(dir.path(), &["B", "--parent", &parent]);

    trim(dir.path())
        .args(["reorder", "--parent", &parent, &b, &a])
        .assert()
        .success();
    let shown = json_out(trim(dir.path()).args(["show", &parent]));
    assert_eq!(shown["children"][0], b.as_str());
    assert_eq!(shown["children"][1], a.as_str());

    trim(dir.path())
        .args(["reorder", "--parent", &parent, &b])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid reorder"));
}

#[test]
fn category_lifecycle() {
    let dir = init();
    trim(dir.path()).args(["category", "add", "Travel"]).assert().success();
    trim(dir.path())
        .args(["category", "add", "Travel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    trim(dir.path())
        .args(["category", "delete", "Health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("used by 1 decision"));

    trim(dir.path())
        .args(["category", "rename", "Health", "Fitness"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 decision(s) updated"));

    let cats = json_out(trim(dir.path()).args(["category", "list"]));
    let names: Vec<&str> = cats
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Fitness"));
    assert!(names.contains(&"Travel"));
    assert!(!names.contains(&"Health"));
}

#[test]
fn json_stdout_stays_clean_with_logging() {
    let dir = init();
    let output = trim(dir.path())
        .env("TRIM_LOG", "debug")
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(rows.as_array().unwrap().len() >= 5);
}
