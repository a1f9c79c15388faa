use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn farmbook_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("farmbook"))
}

fn cmd_with_home() -> (tempfile::TempDir, Command) {
    let home = tempfile::tempdir().expect("tempdir");
    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.env("FARMBOOK_NET_DELAY_MS", "0");
    (home, cmd)
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
fn add_and_list_core_entities() {
    let (home, _cmd) = cmd_with_home();

    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);
    run_ok(&home, &["category", "add", "Milk Sales", "--type", "income"]);
    run_ok(&home, &["account", "add", "Checking", "--type", "standard"]);
    run_ok(
        &home,
        &[
            "tx",
            "add",
            "expense",
            "120",
            "--category",
            "Feed",
            "--account",
            "Checking",
            "-m",
            "Pellet order",
            "--date",
            "2026-05-01",
        ],
    );

    let cats = run_ok_out(&home, &["category", "list"]);
    assert!(cats.contains("Feed"));
    assert!(cats.contains("Milk Sales"));

    let txs = run_ok_out(&home, &["tx", "list"]);
    assert!(txs.contains("2026-05-01"));
    assert!(txs.contains("expense"));
    assert!(txs.contains("120"));
    assert!(txs.contains("Pellet order"));
}

#[test]
fn tx_add_rejects_unknown_references_and_bad_input() {
    let (home, _cmd) = cmd_with_home();

    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);
    run_ok(&home, &["account", "add", "Checking", "--type", "standard"]);

    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.args([
        "tx", "add", "expense", "50", "--category", "Fuel", "--account", "Checking",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No such category"));

    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.args([
        "tx", "add", "refund", "50", "--category", "Feed", "--account", "Checking",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid transaction type"));

    // Amounts are unsigned; direction comes from the transaction type.
    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.args([
        "tx", "add", "expense", "--category", "Feed", "--account", "Checking", "--", "-50",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("must be >= 0"));
}

#[test]
fn account_payment_day_is_credit_only() {
    let (home, _cmd) = cmd_with_home();

    let mut cmd = farmbook_cmd();
    cmd.env("FARMBOOK_HOME", home.path());
    cmd.args([
        "account",
        "add",
        "Checking",
        "--type",
        "standard",
        "--payment-day",
        "15",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("only applies to credit accounts"));

    run_ok(
        &home,
        &[
            "account",
            "add",
            "Farm Card",
            "--type",
            "credit",
            "--payment-day",
            "15",
        ],
    );

    let out = run_ok_out(&home, &["account", "list"]);
    assert!(out.contains("Farm Card"));
    assert!(out.contains("credit"));
    assert!(out.contains("15"));
}

#[test]
fn empty_lists_print_placeholders() {
    let (home, _cmd) = cmd_with_home();

    assert!(run_ok_out(&home, &["tx", "list"]).contains("(no transactions)"));
    assert!(run_ok_out(&home, &["category", "list"]).contains("(no categories)"));
    assert!(run_ok_out(&home, &["liability", "list"]).contains("(no liabilities)"));
    assert!(run_ok_out(&home, &["animal", "list"]).contains("(no animals)"));
}

#[test]
fn farm_rename_shows_on_dashboard() {
    let (home, _cmd) = cmd_with_home();

    run_ok(&home, &["farm", "rename", "Sunrise Hollow"]);
    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("farm\tSunrise Hollow"));
}
