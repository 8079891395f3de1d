use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn list_corpora_prints_directory_entries() {
    let home = tempdir().unwrap();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("zebra"), "stripe\n").unwrap();
    fs::write(dir.path().join("animals"), "cat\ndog\n").unwrap();

    let output = Command::cargo_bin("tak")
        .unwrap()
        .env("HOME", home.path())
        .args(["--list-corpora", "--corpus-dir"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "animals\nzebra\n");
}

#[test]
fn list_corpora_defaults_to_bundled_lists() {
    let home = tempdir().unwrap();
    let output = Command::cargo_bin("tak")
        .unwrap()
        .env("HOME", home.path())
        .arg("--list-corpora")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l == "english"));
    assert!(stdout.lines().any(|l| l == "german"));
}

#[test]
fn refuses_to_start_without_a_tty() {
    let home = tempdir().unwrap();
    Command::cargo_bin("tak")
        .unwrap()
        .env("HOME", home.path())
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn save_config_rejects_unlisted_duration() {
    let home = tempdir().unwrap();
    Command::cargo_bin("tak")
        .unwrap()
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .args(["-t", "30", "--save-config", "--list-corpora"])
        .assert()
        .failure();
}
