//! End-to-end session flow through the library crates: login, quizzes,
//! analytics, leaderboard and export, with a manual clock.

use chrono::{Duration, NaiveDate};

use quizlearn_core::bank::QuestionBank;
use quizlearn_core::engine::Phase;
use quizlearn_core::error::QuizError;
use quizlearn_core::model::{Answer, Difficulty};
use quizlearn_core::session::SessionStore;
use quizlearn_core::statistics::{compute_leaderboard, student_analytics, students_with_history};
use quizlearn_core::traits::ManualClock;
use quizlearn_report::csv::{export_csv, write_csv_export};
use quizlearn_report::html::write_html_export;
use quizlearn_report::theme::Palette;

fn start() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

/// Take a quiz, answering the first `correct` questions right and leaving
/// the rest unanswered.
fn take_quiz(
    store: &mut SessionStore,
    clock: &ManualClock,
    topic: &str,
    count: usize,
    correct: usize,
    seconds: i64,
) {
    let quiz = store.initialize(topic, Difficulty::Easy, count).unwrap();
    let keys: Vec<String> = quiz
        .questions()
        .iter()
        .map(|q| q.correct_answer.clone())
        .collect();
    for (i, key) in keys.into_iter().take(correct).enumerate() {
        store.record_answer(i, Answer::Selected(key)).unwrap();
    }
    clock.advance(Duration::seconds(seconds));
    store.validate().unwrap();
    store.submit().unwrap();
    store.start_new_session();
}

#[test]
fn two_students_full_flow() {
    let clock = ManualClock::new(start());
    let mut store = SessionStore::new(QuestionBank::builtin().unwrap())
        .with_seed(11)
        .with_clock(clock.clone());

    assert_eq!(store.phase(), Phase::NoSession);
    assert_eq!(
        store
            .initialize("Mathematics", Difficulty::Easy, 3)
            .unwrap_err(),
        QuizError::NotLoggedIn
    );

    store.login("alice smith").unwrap();
    assert_eq!(store.phase(), Phase::Configuring);
    take_quiz(&mut store, &clock, "Mathematics", 5, 4, 90);
    take_quiz(&mut store, &clock, "Science", 3, 3, 45);

    store.login("bob").unwrap();
    take_quiz(&mut store, &clock, "Mathematics", 1, 0, 3700);

    let history = store.history();
    assert_eq!(history.len(), 3);
    assert_eq!(students_with_history(history), vec!["Alice Smith", "Bob"]);

    // 4 easy Mathematics questions in the built-in bank, so 5 clamps to 4
    assert_eq!(history[0].total, 4);
    assert_eq!(history[0].percentage, 100);
    assert_eq!(history[1].percentage, 100);
    assert_eq!(history[2].percentage, 0);
    assert_eq!(history[2].time_taken, 3700);

    let board = compute_leaderboard(history).unwrap();
    assert_eq!(board[0].student, "Alice Smith");
    assert_eq!(board[0].quizzes_taken, 2);
    assert_eq!(board[1].student, "Bob");

    let alice = student_analytics(history, "Alice Smith").unwrap();
    assert_eq!(alice.topic_mastery.len(), 2);
    assert_eq!(alice.progression.len(), 2);
    assert_eq!(alice.progression[0].date, "2024-05-01 09:01 AM");

    let csv = export_csv(history, "Bob").unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.contains("01:01:40"));
    assert!(!csv.contains("Alice"));
}

#[test]
fn exports_land_in_export_dir() {
    let clock = ManualClock::new(start());
    let mut store = SessionStore::new(QuestionBank::builtin().unwrap())
        .with_seed(5)
        .with_clock(clock.clone());
    store.login("carol").unwrap();
    take_quiz(&mut store, &clock, "History", 3, 2, 30);

    let dir = tempfile::tempdir().unwrap();
    let history = store.history();

    let csv = write_csv_export(history, "Carol", dir.path())
        .unwrap()
        .unwrap();
    let html = write_html_export(
        history,
        "Carol",
        &Palette::default_dark(),
        store.now(),
        dir.path(),
    )
    .unwrap()
    .unwrap();

    assert!(csv.ends_with("QuizLearn_Analytics_Carol.csv"));
    assert!(html.ends_with("QuizLearn_Analytics_Carol.html"));
    assert!(write_csv_export(history, "Dave", dir.path())
        .unwrap()
        .is_none());
}

#[test]
fn logout_discards_quiz_but_keeps_history() {
    let clock = ManualClock::new(start());
    let mut store = SessionStore::new(QuestionBank::builtin().unwrap())
        .with_seed(9)
        .with_clock(clock.clone());

    store.login("erin").unwrap();
    take_quiz(&mut store, &clock, "Geography", 1, 1, 10);
    store.initialize("Geography", Difficulty::Easy, 3).unwrap();
    assert_eq!(store.phase(), Phase::InProgress);

    store.logout();
    assert_eq!(store.phase(), Phase::NoSession);
    assert!(store.current_quiz().is_none());
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.validate().unwrap_err(), QuizError::NotLoggedIn);
}
