use std::io::Write;

use assert_cmd::Command;
use predicates as pred;
use predicates::prelude::PredicateBooleanExt;
use tempfile::NamedTempFile;

#[test]
fn end_to_end_session_renders_expected_views() {
    // Jonas logs in, wires 455.23 to Jessica, takes a 2000 loan (backed by
    // his 25000 deposit) and then botches the close confirmation pin.
    // Starting balance 25952.59 -> 25497.36 after the transfer -> 27497.36
    // once the loan lands.
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "action, user, pin, to, amount\n\
    login, js, 1111,,\n\
    transfer,,, jd, 455.23\n\
    loan,,,, 2000\n\
    close, js, 9999,,\n\
    frobnicate,,,,"
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_bankist_engine");
    let mut cmd = Command::new(exe);
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(pred::str::contains("Welcome back, Jonas!"))
        .stdout(pred::str::contains("Yesterday"))
        .stdout(pred::str::contains("Balance: 25497.36 €"))
        .stdout(pred::str::contains("Loan approved, processing..."))
        .stdout(pred::str::contains("Balance: 27497.36 €"))
        .stderr(pred::str::contains("incorrect pin"))
        .stderr(pred::str::contains("invalid action: frobnicate"));
}

#[test]
fn wrong_login_pin_keeps_the_vault_shut() {
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(
        file,
        "action, user, pin, to, amount\n\
    login, jd, 1234,,\n\
    balance,,,,"
    )
    .unwrap();

    let exe = env!("CARGO_BIN_EXE_bankist_engine");
    let mut cmd = Command::new(exe);
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(pred::str::contains("Welcome back").not())
        .stderr(pred::str::contains("incorrect pin"))
        .stderr(pred::str::contains("no account is logged in"));
}
