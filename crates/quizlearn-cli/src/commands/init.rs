//! The `quizlearn init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    // Create quizlearn.toml
    if Path::new("quizlearn.toml").exists() {
        println!("quizlearn.toml already exists, skipping.");
    } else {
        std::fs::write("quizlearn.toml", SAMPLE_CONFIG).context("failed to write quizlearn.toml")?;
        println!("Created quizlearn.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    let example_path = Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK).context("failed to write banks/example.toml")?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add your own questions to banks/example.toml");
    println!("  2. Run: quizlearn validate --bank banks");
    println!("  3. Run: quizlearn play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r##"# quizlearn configuration

# Bank file or directory of .toml banks. Remove to use the built-in bank.
question_bank = "banks"

# Questions per quiz when `start` is given no count (1, 3, 5 or 10)
default_count = 5

# Minimum percentage for a "Passed" result
pass_mark = 60

# Where `export` writes CSV and HTML files
export_dir = "./quizlearn-exports"

# Palette for HTML exports (see `quizlearn palettes`)
palette = "Default Dark"

# Used when palette = "Custom"
[custom_palette]
background = "#0b0e14"
text = "#ffffff"
card = "#161b22"
accent = "#6366f1"
"##;

const EXAMPLE_BANK: &str = r#"[bank]
name = "Example Bank"

[[questions]]
topic = "Astronomy"
difficulty = "easy"
question = "Which planet is known as the Red Planet?"
options = ["Venus", "Mars", "Jupiter", "Mercury"]
correct_answer = "Mars"

[[questions]]
topic = "Astronomy"
difficulty = "easy"
question = "What is at the centre of our solar system?"
options = ["The Earth", "The Moon", "The Sun"]
correct_answer = "The Sun"

[[questions]]
topic = "Astronomy"
difficulty = "medium"
question = "Which planet has the most moons?"
options = ["Saturn", "Earth", "Mars", "Neptune"]
correct_answer = "Saturn"

[[questions]]
topic = "Astronomy"
difficulty = "hard"
question = "What is the approximate age of the universe?"
options = ["4.6 billion years", "13.8 billion years", "100 billion years"]
correct_answer = "13.8 billion years"
"#;
