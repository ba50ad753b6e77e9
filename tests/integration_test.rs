//! Integration tests for the ATM simulator CLI.
//!
//! These tests run the actual binary, feed commands on stdin and check the
//! printed transcript.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Run the binary with the given stdin and optional accounts file, return stdout
fn run_atm(input: &str, accounts: Option<&str>) -> String {
    let mut cmd = Command::cargo_bin("atm-simulator").unwrap();
    if let Some(path) = accounts {
        cmd.arg(path);
    }
    let assert = cmd.write_stdin(input).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn accounts_file(csv: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(csv.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_welcome_banner() {
    let output = run_atm("end\n", None);
    assert!(output.starts_with("Welcome to the ATM! Please login."));
}

#[test]
fn test_default_accounts_session() {
    let output = run_atm(
        "authorize 2001377812 5950\n\
         balance\n\
         withdraw 40\n\
         deposit 15.5\n\
         logout\n\
         end\n",
        None,
    );

    assert!(output.contains("2001377812 successfully authorized."));
    assert!(output.contains("Current balance: $60.00."));
    assert!(output.contains("Amount dispensed: $40.00.\nCurrent balance: $20.00."));
    assert!(output.contains("Current balance: $35.50."));
    assert!(output.contains("Account 2001377812 logged out."));
}

#[test]
fn test_commands_before_login() {
    let output = run_atm("balance\nlogout\n", None);
    assert!(output.contains("Authorization required."));
    assert!(output.contains("No account is currently authorized."));
}

#[test]
fn test_bad_pin() {
    let output = run_atm("authorize 2001377812 0000\nbalance\n", None);
    assert!(output.contains("Authorization failed."));
    assert!(output.contains("Authorization required."));
}

#[test]
fn test_end_is_case_insensitive_and_stops_processing() {
    let output = run_atm("END\nauthorize 2001377812 5950\n", None);
    assert!(!output.contains("successfully authorized"));
}

#[test]
fn test_eof_exits_cleanly() {
    let output = run_atm("authorize 2001377812 5950\n", None);
    assert!(output.contains("successfully authorized"));
}

#[test]
fn test_overdraft_from_accounts_file() {
    let file = accounts_file("account_id,pin,balance\n42,0042,100.00\n");
    let output = run_atm(
        "authorize 42 0042\nwithdraw 120\nwithdraw 20\nhistory\n",
        file.path().to_str(),
    );

    assert!(output.contains("You have been charged an overdraft fee of $5.00."));
    assert!(output.contains("Current balance: $-25.00."));
    assert!(output.contains("Your account is overdrawn!"));
    assert!(output.contains(" -5.00 -25.00"));
    assert!(output.contains(" -120.00 -20.00"));
}

#[test]
fn test_unknown_command_and_bad_amount() {
    let output = run_atm(
        "authorize 2001377812 5950\nfly\nwithdraw twenty\nwithdraw 30\n",
        None,
    );

    assert!(output.contains("Command not recognized. Please try again."));
    assert!(output.contains("Command failed: invalid amount \"twenty\"."));
    assert!(output.contains("Please enter a multiple of $20."));
}

#[test]
fn test_missing_accounts_file_error() {
    let mut cmd = Command::cargo_bin("atm-simulator").unwrap();
    cmd.arg("nonexistent.csv")
        .write_stdin("end\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_malformed_accounts_file_error() {
    let file = accounts_file("account_id,pin,balance\n1,1111,plenty\n");
    let mut cmd = Command::cargo_bin("atm-simulator").unwrap();
    cmd.arg(file.path())
        .write_stdin("end\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid account at row 2"));
}

#[test]
fn test_oversized_and_sub_cent_deposits_keep_session_running() {
    let output = run_atm(
        "authorize 2001377812 5950\n\
         deposit 79228162514264337593543950335\n\
         deposit 1.005\n\
         balance\n",
        None,
    );

    assert!(output.contains("Deposits are limited to $1000000 per transaction."));
    assert!(output.contains("Command failed: invalid amount \"1.005\"."));
    assert!(output.contains("Current balance: $60.00."));
}
