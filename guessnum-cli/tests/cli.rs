use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "guessnum-cli-{label}-{}.json",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn guessnum(save: &Path, args: &[&str], input: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_guessnum");
    let mut child = Command::new(exe)
        .arg("--save-file")
        .arg(save)
        .args(args)
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("run cli");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for cli")
}

fn sweep(max: u32) -> String {
    (1..=max).map(|n| format!("{n}\n")).collect()
}

#[test]
fn playing_a_round_updates_saved_stats() {
    let save = temp_path("play");
    let output = guessnum(&save, &["--seed", "5", "play", "easy"], &sweep(50));
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Guessnum"));
    assert!(stdout.contains("You win!"));

    let stats = guessnum(&save, &["stats"], "");
    let stdout = String::from_utf8_lossy(&stats.stdout);
    assert!(stdout.contains("Total games: 1"));
    assert!(stdout.contains("Win rate: 100%"));

    let history = guessnum(&save, &["history", "--limit", "5"], "");
    assert!(String::from_utf8_lossy(&history.stdout).contains("WIN"));

    let achievements = guessnum(&save, &["achievements"], "");
    assert!(String::from_utf8_lossy(&achievements.stdout).contains("Beginner"));
    std::fs::remove_file(save).ok();
}

#[test]
fn export_import_and_clear_round_trip() {
    let save = temp_path("export");
    let export_path = temp_path("export-doc");
    assert!(
        guessnum(&save, &["--seed", "9", "play", "medium"], &sweep(100))
            .status
            .success()
    );

    let export = Command::new(env!("CARGO_BIN_EXE_guessnum"))
        .arg("--save-file")
        .arg(&save)
        .arg("export")
        .arg("--output")
        .arg(&export_path)
        .output()
        .expect("run cli");
    assert!(export.status.success());
    let document = std::fs::read_to_string(&export_path).expect("read export");
    assert!(document.contains("\"version\": \"2.1.0\""));
    assert!(document.contains("\"totalGames\": 1"));

    let cleared = guessnum(&save, &["clear", "--yes"], "");
    assert!(cleared.status.success());
    let stats = guessnum(&save, &["stats"], "");
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 0"));

    let imported = guessnum(&save, &["import", export_path.to_str().unwrap()], "");
    assert!(imported.status.success());
    let stats = guessnum(&save, &["stats"], "");
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 1"));

    std::fs::remove_file(save).ok();
    std::fs::remove_file(export_path).ok();
}

#[test]
fn import_without_version_fails() {
    let save = temp_path("bad-import");
    let doc = temp_path("bad-doc");
    std::fs::write(&doc, r#"{"stats":{"totalGames":5}}"#).expect("write doc");
    let output = guessnum(&save, &["import", doc.to_str().unwrap()], "");
    assert!(!output.status.success());
    let stats = guessnum(&save, &["stats"], "");
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 0"));
    std::fs::remove_file(doc).ok();
}

#[test]
fn unknown_difficulty_is_reported() {
    let save = temp_path("unknown");
    let output = guessnum(&save, &["play", "nightmare"], "");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown difficulty"));
}

#[test]
fn clear_without_confirmation_keeps_progress() {
    let save = temp_path("keep");
    guessnum(&save, &["play", "easy"], &sweep(50));
    let output = guessnum(&save, &["clear"], "no\n");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Nothing cleared"));
    let stats = guessnum(&save, &["stats"], "");
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 1"));
    std::fs::remove_file(save).ok();
}

#[test]
fn corrupt_save_file_starts_fresh() {
    let save = temp_path("corrupt");
    std::fs::write(&save, r#"{"guessNumberGame": "{\"stats\""#).expect("write save");
    let stats = guessnum(&save, &["stats"], "");
    assert!(stats.status.success());
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 0"));

    let cleared = guessnum(&save, &["clear", "--yes"], "");
    assert!(cleared.status.success());
    let played = guessnum(&save, &["--seed", "3", "play", "easy"], &sweep(50));
    assert!(played.status.success());
    let stats = guessnum(&save, &["stats"], "");
    assert!(String::from_utf8_lossy(&stats.stdout).contains("Total games: 1"));
    std::fs::remove_file(save).ok();
}
