use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("chatmark")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("tokens"))
        .stdout(predicate::str::contains("narrate"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_render_help_shows_options() {
    cargo_bin_cmd!("chatmark")
        .args(["render", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--target"))
        .stdout(predicate::str::contains("--chars"))
        .stdout(predicate::str::contains("--no-cjk"));
}

#[test]
fn test_cjk_flags_conflict() {
    cargo_bin_cmd!("chatmark")
        .args(["render", "--cjk", "--no-cjk", "漢"])
        .assert()
        .failure();
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("chatmark")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
