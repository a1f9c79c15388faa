use assert_cmd::prelude::*;
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

fn seed_accounts(home: &tempfile::TempDir) {
    run_ok(home, &["account", "add", "Checking", "--type", "standard"]);
    run_ok(
        home,
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
}

fn add_tx(home: &tempfile::TempDir, kind: &str, amount: &str, cat: &str, acct: &str, date: &str) {
    run_ok(
        home,
        &[
            "tx", "add", kind, amount, "--category", cat, "--account", acct, "--date", date,
        ],
    );
}

#[test]
fn income_on_a_credit_account_is_not_revenue() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    run_ok(&home, &["category", "add", "Milk Sales", "--type", "income"]);

    // A card payment: income posted against the credit account.
    add_tx(&home, "income", "100", "Milk Sales", "Farm Card", "2026-05-02");

    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("revenue\t0"));

    // The same income on a standard account is revenue.
    add_tx(&home, "income", "100", "Milk Sales", "Checking", "2026-05-03");
    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("revenue\t100"));
}

#[test]
fn gross_margin_is_zero_without_revenue() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);

    add_tx(&home, "expense", "50", "Feed", "Checking", "2026-05-02");

    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("expenses\t50"));
    assert!(out.contains("gross-margin\t0%\tloss"));
}

#[test]
fn gross_margin_health_labels() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    run_ok(&home, &["category", "add", "Milk Sales", "--type", "income"]);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);

    add_tx(&home, "income", "1000", "Milk Sales", "Checking", "2026-05-02");
    add_tx(&home, "expense", "400", "Feed", "Checking", "2026-05-03");

    // (1000 - 400) / 1000 * 100 = 60%
    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("gross-margin\t60.0%\thealthy") || out.contains("gross-margin\t60%\thealthy"));

    add_tx(&home, "expense", "550", "Feed", "Checking", "2026-05-04");
    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("\tthin"));
}

#[test]
fn top_expense_segments_are_bounded_and_sorted() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    for name in ["Feed", "Fuel", "Vet", "Repairs"] {
        run_ok(&home, &["category", "add", name, "--type", "expense"]);
    }

    add_tx(&home, "expense", "100", "Repairs", "Checking", "2026-05-01");
    add_tx(&home, "expense", "400", "Feed", "Checking", "2026-05-02");
    add_tx(&home, "expense", "200", "Vet", "Checking", "2026-05-03");
    add_tx(&home, "expense", "300", "Fuel", "Checking", "2026-05-04");

    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    let feed = out.find("Feed\t400").expect("Feed line");
    let fuel = out.find("Fuel\t300").expect("Fuel line");
    let vet = out.find("Vet\t200").expect("Vet line");
    assert!(feed < fuel && fuel < vet);
    // Only the top three segments are shown.
    assert!(!out.contains("Repairs\t100"));
}

#[test]
fn deleted_category_falls_back_to_other() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    run_ok(&home, &["category", "add", "Temp", "--type", "expense"]);

    add_tx(&home, "expense", "75", "Temp", "Checking", "2026-05-02");
    run_ok(&home, &["category", "rm", "Temp"]);

    let out = run_ok_out(&home, &["dashboard", "--now", "2026-05-15"]);
    assert!(out.contains("Other\t75"));
}

#[test]
fn monthly_series_is_sorted_and_conserves_totals() {
    let home = tempfile::tempdir().expect("tempdir");
    seed_accounts(&home);
    run_ok(&home, &["category", "add", "Milk Sales", "--type", "income"]);
    run_ok(&home, &["category", "add", "Feed", "--type", "expense"]);

    // Out-of-order inserts across three months.
    add_tx(&home, "expense", "300", "Feed", "Checking", "2026-03-10");
    add_tx(&home, "income", "1000", "Milk Sales", "Checking", "2026-01-05");
    add_tx(&home, "expense", "200", "Feed", "Checking", "2026-01-20");
    // A card payment lands in its month's bucket but counts toward neither side.
    add_tx(&home, "income", "150", "Milk Sales", "Farm Card", "2026-02-11");

    let out = run_ok_out(&home, &["dashboard", "--now", "2026-03-15"]);
    let jan = out.find("Jan 26\t1000\t200").expect("January bucket");
    let feb = out.find("Feb 26\t0\t0").expect("February bucket");
    let mar = out.find("Mar 26\t0\t300").expect("March bucket");
    assert!(jan < feb && feb < mar);

    // Bucket totals line up with the summary lines.
    assert!(out.contains("revenue\t1000"));
    assert!(out.contains("expenses\t500"));
}
