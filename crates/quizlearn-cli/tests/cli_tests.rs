//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from any config in the user's home or the working
/// directory.
fn quizlearn(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizlearn").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("QUIZLEARN_PALETTE")
        .env_remove("QUIZLEARN_EXPORT_DIR")
        .env_remove("QUIZLEARN_SEED")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn validate_builtin_bank() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("QuizLearn Starter Bank"))
        .stdout(predicate::str::contains("48 questions"))
        .stdout(predicate::str::contains("Question bank valid."));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(
        &path,
        r#"[bank]
name = "Broken"

[[questions]]
topic = "Art"
difficulty = "easy"
question = "Primary colour?"
options = ["Red", "Green"]
correct_answer = "Purple"
"#,
    )
    .unwrap();

    quizlearn(&dir)
        .arg("validate")
        .arg("--bank")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("'Purple' is not among the options"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .arg("validate")
        .arg("--bank")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizlearn(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizlearn.toml"))
        .stdout(predicate::str::contains("Created banks/example.toml"));

    assert!(dir.path().join("quizlearn.toml").exists());
    assert!(dir.path().join("banks/example.toml").exists());

    // The generated bank is valid
    quizlearn(&dir)
        .arg("validate")
        .arg("--bank")
        .arg("banks")
        .assert()
        .success()
        .stdout(predicate::str::contains("Astronomy"))
        .stdout(predicate::str::contains("Question bank valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("quizlearn.toml"), "pass_mark = 50\n").unwrap();

    quizlearn(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizlearn.toml already exists"));

    let content = std::fs::read_to_string(dir.path().join("quizlearn.toml")).unwrap();
    assert_eq!(content, "pass_mark = 50\n");
}

#[test]
fn palettes_lists_all() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .arg("palettes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default Dark"))
        .stdout(predicate::str::contains("Slate & Gold"))
        .stdout(predicate::str::contains("Custom"));
}

#[test]
fn palettes_json() {
    let dir = TempDir::new().unwrap();
    let output = quizlearn(&dir)
        .arg("palettes")
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let palettes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let list = palettes.as_array().unwrap();
    assert_eq!(list.len(), 11);
    assert_eq!(list[0]["name"], "Default Dark");
}

#[test]
fn play_requires_login() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .arg("play")
        .write_stdin("topics\nquit\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(
                "Welcome. Please identify yourself to access the assessments.",
            )
            .count(2),
        )
        .stdout(predicate::str::contains("Goodbye."));
}

#[test]
fn play_scripted_quiz() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .args(["play", "--seed", "42"])
        .write_stdin(
            "login ada lovelace\n\
             topics\n\
             start hard 1 science\n\
             answer 1 -\n\
             validate\n\
             submit\n\
             leaderboard\n\
             analytics\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains(", Ada Lovelace!"))
        .stdout(predicate::str::contains("Geography"))
        .stdout(predicate::str::contains("Started Science (Hard): 1 question(s)."))
        .stdout(predicate::str::contains("Incorrect. The right answer was:"))
        .stdout(predicate::str::contains("Result: 0/1 (0%) Failed"))
        .stdout(predicate::str::contains("Performance profile: Ada Lovelace"));
}

#[test]
fn play_exports_to_configured_dir() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("out");
    std::fs::write(
        dir.path().join("custom.toml"),
        format!(
            "export_dir = \"{}\"\npalette = \"Amethyst\"\n",
            exports.display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    quizlearn(&dir)
        .args(["play", "--config", "custom.toml"])
        .write_stdin("login grace\nstart medium 3 History\nvalidate\nsubmit\nexport\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("QuizLearn_Analytics_Grace.csv"));

    let csv = std::fs::read_to_string(exports.join("QuizLearn_Analytics_Grace.csv")).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.starts_with("STUDENT,TOPIC,DIFFICULTY"));

    let html = std::fs::read_to_string(exports.join("QuizLearn_Analytics_Grace.html")).unwrap();
    assert!(html.contains("#7c3aed"));
}

#[test]
fn play_rejects_unknown_palette() {
    let dir = TempDir::new().unwrap();
    quizlearn(&dir)
        .args(["play", "--palette", "Neon Dreams"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown palette 'Neon Dreams'"));
}
