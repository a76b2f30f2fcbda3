//! The `quizlearn validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizlearn_core::bank::{load_bank, validate_bank, QuestionBank};
use quizlearn_core::model::Difficulty;

pub fn execute(bank_path: Option<PathBuf>) -> Result<()> {
    let bank = match &bank_path {
        Some(path) => load_bank(path)?,
        None => QuestionBank::builtin()?,
    };

    let topics: Vec<&str> = bank.topics().collect();
    println!(
        "Question bank: {} ({} topics, {} questions)",
        bank.name,
        topics.len(),
        bank.question_count()
    );
    for topic in &topics {
        let sizes: Vec<String> = Difficulty::ALL
            .iter()
            .map(|d| format!("{d} {}", bank.pool_size(topic, *d)))
            .collect();
        println!("  {topic}: {}", sizes.join(", "));
    }

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = match &w.question {
            Some(q) => format!("  [{}] \"{q}\"", w.pool),
            None => format!("  [{}]", w.pool),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if bank.is_empty() {
        println!("\nThe bank has no questions.");
    } else if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
