use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Runs against an empty home so the user's config never leaks in.
fn chatmark(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("chatmark");
    cmd.env("CHATMARK_HOME", home.path())
        .env_remove("CHATMARK_CONFIG")
        .env_remove("CHATMARK_LOG");
    cmd
}

#[test]
fn test_render_emphasis() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "**bold** *it* ***both*** ~gone~"])
        .assert()
        .success()
        .stdout("<b>bold</b> <i>it</i> <b><i>both</i></b> <s>gone</s>\n");
}

#[test]
fn test_render_nested_emphasis() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "~**x**~ **[[a|b]]**"])
        .assert()
        .success()
        .stdout("<s><b>x</b></s> <b><ruby class=\"chatmark-ruby\">a<rt>b</rt></ruby></b>\n");
}

#[test]
fn test_unmatched_delimiters_pass_through() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "**oops"])
        .assert()
        .success()
        .stdout("**oops\n");
}

#[test]
fn test_partial_ruby_keeps_gloss() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "--chars", "1", "[[日本|にほん]]"])
        .assert()
        .success()
        .stdout("<ruby class=\"chatmark-ruby\">日<rt>にほん</rt></ruby>\n");
}

#[test]
fn test_cjk_flag_wraps_ideographs() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "--cjk", "-t", "sender", "a漢"])
        .assert()
        .success()
        .stdout("a<span class=\"chatmark-cjk-sender\">漢</span>\n");
}

#[test]
fn test_config_enables_cjk() {
    let home = tempdir().unwrap();
    fs::write(home.path().join("config.toml"), "[cjk]\ncontent = true\n").unwrap();

    chatmark(&home)
        .args(["render", "漢"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chatmark-cjk-content"));

    chatmark(&home)
        .args(["render", "--no-cjk", "漢"])
        .assert()
        .success()
        .stdout("漢\n");
}

#[test]
fn test_narrator_target_escapes_html() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "-t", "narrator", "<b>x</b>"])
        .assert()
        .success()
        .stdout("&lt;b&gt;x&lt;/b&gt;\n");
}

#[test]
fn test_render_reads_stdin() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["render", "-f", "plain"])
        .write_stdin("**a** [[b|c]]\n")
        .assert()
        .success()
        .stdout("a b\n");
}

#[test]
fn test_tokens_json() {
    let home = tempdir().unwrap();
    let output = chatmark(&home)
        .args(["tokens", "--json", "x [[日本|にほん]]"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let tokens: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tokens = tokens.as_array().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0]["kind"], "plain");
    assert_eq!(tokens[1]["kind"], "ruby");
    assert_eq!(tokens[1]["body"], "日本");
    assert_eq!(tokens[1]["gloss"], "にほん");
}

#[test]
fn test_tokens_table_shows_display_length() {
    let home = tempdir().unwrap();
    chatmark(&home)
        .args(["tokens", "**ab** [[c|d]]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bold"))
        .stdout(predicate::str::contains("display length: 4"));
}
