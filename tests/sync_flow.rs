use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn farmbook_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("farmbook"))
}

fn run_ok(home: &tempfile::TempDir, args: &[&str]) {
    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.env("FARMBOOK_NET_DELAY_MS", "0");
    cmd.args(args);
    cmd.assert().success();
}

fn run_ok_out(home: &tempfile::TempDir, args: &[&str]) -> String {
    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.env("FARMBOOK_NET_DELAY_MS", "0");
    cmd.args(args);
    let out = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(out).expect("utf8 stdout")
}

#[test]
fn push_then_pull_restores_the_pushed_state() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["login", "alice@farm.com"]);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);
    run_ok(&home, &["category", "add", "Fuel", "--type", "expense"]);
    run_ok(&home, &["sync", "push"]);

    // Local edits after the push are discarded by a pull (last write wins).
    run_ok(&home, &["category", "add", "Scratch", "--type", "expense"]);
    assert!(run_ok_out(&home, &["category", "list"]).contains("Scratch"));

    run_ok(&home, &["sync", "pull"]);
    let cats = run_ok_out(&home, &["category", "list"]);
    assert!(cats.contains("Feed"));
    assert!(cats.contains("Fuel"));
    assert!(!cats.contains("Scratch"));
}

#[test]
fn identity_is_case_insensitive_and_trimmed() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["login", "  Alice@Farm.COM  "]);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);
    run_ok(&home, &["sync", "push"]);

    let out = run_ok_out(&home, &["sync", "status"]);
    assert!(out.contains("Identity: Alice@Farm.COM"));

    // Same mailbox, different spelling: the pull must find the pushed state.
    run_ok(&home, &["login", "alice@farm.com"]);
    run_ok(&home, &["category", "rm", "Feed"]);
    run_ok(&home, &["sync", "pull"]);
    assert!(run_ok_out(&home, &["category", "list"]).contains("Feed"));
}

#[test]
fn identities_are_isolated_from_each_other() {
    let home = tempfile::tempdir().expect("tempdir");

    run_ok(&home, &["login", "alice@farm.com"]);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);
    run_ok(&home, &["sync", "push"]);

    run_ok(&home, &["login", "bob@farm.com"]);
    let out = run_ok_out(&home, &["sync", "pull"]);
    assert!(out.contains("(no cloud data for bob@farm.com)"));
}

#[test]
fn sync_requires_a_login() {
    let home = tempfile::tempdir().expect("tempdir");

    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.env("FARMBOOK_NET_DELAY_MS", "0");
    cmd.args(["sync", "push"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn status_reports_identity_and_last_sync() {
    let home = tempfile::tempdir().expect("tempdir");

    let out = run_ok_out(&home, &["sync", "status"]);
    assert!(out.contains("Identity: (not logged in)"));
    assert!(out.contains("Last sync: (never)"));

    run_ok(&home, &["login", "alice@farm.com"]);
    run_ok(&home, &["sync", "push"]);

    let out = run_ok_out(&home, &["sync", "status"]);
    assert!(out.contains("Identity: alice@farm.com"));
    assert!(!out.contains("Last sync: (never)"));
}
