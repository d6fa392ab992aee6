use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "kakeibo_cli";

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("KAKEIBO_CLI_SCRIPT", "1");
    cmd.env("KAKEIBO_HOME", home.path());
    cmd
}

#[test]
fn cli_help_command_prints_overview() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("help\nexit\n")
        .assert()
        .success()
        .stdout(contains("Available commands").and(contains("add-expense")));
}

#[test]
fn cli_version_command_prints_version_info() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("version\nexit\n")
        .assert()
        .success()
        .stdout(contains("Kakeibo Core"));
}

#[test]
fn cli_add_and_balance_flow_reports_totals() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("add-income 300000 Salary\nadd-expense 50000 Food\nbalance\nexit\n")
        .assert()
        .success()
        .stdout(
            contains("Income:  300000 JPY")
                .and(contains("Expense: 50000 JPY"))
                .and(contains("Balance: 250000 JPY")),
        );
}

#[test]
fn cli_state_survives_between_runs() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("add-expense 1200 Food\nexit\n")
        .assert()
        .success();

    script_command(&home)
        .write_stdin("status\nexit\n")
        .assert()
        .success()
        .stdout(contains("Transactions: 1"));
}

#[test]
fn cli_duplicate_category_reports_error_without_aborting() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("add-category Food\nadd-category Gifts\ncategories\nexit\n")
        .assert()
        .success()
        .stderr(contains("Category already exists: Food"))
        .stdout(contains("Gifts"));
}

#[test]
fn cli_invalid_amount_is_rejected_with_message() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("add-expense abc\nstatus\nexit\n")
        .assert()
        .success()
        .stderr(contains("Invalid amount: abc"))
        .stdout(contains("Transactions: 0"));
}

#[test]
fn cli_list_applies_category_filter() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin(
            "add-expense 100 Food 2026-05-01\nadd-expense 200 Housing 2026-05-02\nlist category=Food\nexit\n",
        )
        .assert()
        .success()
        .stdout(contains("Transactions (1)").and(contains("(Food)")));
}

#[test]
fn cli_unknown_command_offers_a_suggestion() {
    let home = TempDir::new().expect("temp home");
    script_command(&home)
        .write_stdin("blance\nexit\n")
        .assert()
        .success()
        .stdout(contains("Suggestion: `balance`?"));
}
