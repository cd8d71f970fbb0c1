use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::tempdir;

#[test]
fn test_narrate_prints_frames_when_piped() {
    let home = tempdir().unwrap();
    cargo_bin_cmd!("chatmark")
        .env("CHATMARK_HOME", home.path())
        .env_remove("CHATMARK_CONFIG")
        .args([
            "narrate",
            "--speed-ms",
            "1",
            "--linger-ms",
            "0",
            "-f",
            "plain",
            "**ab** c",
        ])
        .assert()
        .success()
        .stdout("a\nab\nab \nab c\n");
}

#[test]
fn test_narrate_html_escapes_line() {
    let home = tempdir().unwrap();
    cargo_bin_cmd!("chatmark")
        .env("CHATMARK_HOME", home.path())
        .env_remove("CHATMARK_CONFIG")
        .args([
            "narrate",
            "--speed-ms",
            "1",
            "--linger-ms",
            "0",
            "-q",
            "-f",
            "html",
            "<",
        ])
        .assert()
        .success()
        .stdout("&lt;\n");
}
