//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Difficulty, Question};

/// The bank shipped with the crate, used when no bank file is configured.
const BUILTIN_BANK: &str = include_str!("../data/default_bank.toml");

/// Read-only mapping of topic → difficulty → questions.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    /// Human-readable bank name.
    pub name: String,
    topics: BTreeMap<String, BTreeMap<Difficulty, Vec<Question>>>,
}

impl QuestionBank {
    /// Create an empty bank.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            topics: BTreeMap::new(),
        }
    }

    /// The bank embedded in the binary.
    pub fn builtin() -> Result<Self> {
        parse_bank_str(BUILTIN_BANK, Path::new("<builtin>"))
    }

    /// Append a question to the `(topic, difficulty)` pool.
    pub fn insert(&mut self, topic: impl Into<String>, difficulty: Difficulty, question: Question) {
        self.topics
            .entry(topic.into())
            .or_default()
            .entry(difficulty)
            .or_default()
            .push(question);
    }

    /// Topic names in sorted order.
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.contains_key(topic)
    }

    /// Questions for a topic at a difficulty. `None` if the topic is unknown;
    /// an empty slice if the topic exists without that difficulty.
    pub fn pool(&self, topic: &str, difficulty: Difficulty) -> Option<&[Question]> {
        self.topics.get(topic).map(|levels| {
            levels
                .get(&difficulty)
                .map(Vec::as_slice)
                .unwrap_or_default()
        })
    }

    /// Number of questions in a pool (0 for unknown topics).
    pub fn pool_size(&self, topic: &str, difficulty: Difficulty) -> usize {
        self.pool(topic, difficulty).map_or(0, <[Question]>::len)
    }

    /// Total number of questions across every pool.
    pub fn question_count(&self) -> usize {
        self.topics
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    /// Merge another bank's pools into this one, appending questions.
    pub fn merge(&mut self, other: QuestionBank) {
        for (topic, levels) in other.topics {
            let entry = self.topics.entry(topic).or_default();
            for (difficulty, questions) in levels {
                entry.entry(difficulty).or_default().extend(questions);
            }
        }
    }
}

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlBankHeader {
    #[serde(default = "default_bank_name")]
    name: String,
}

fn default_bank_name() -> String {
    "Question Bank".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    topic: String,
    difficulty: String,
    question: String,
    options: Vec<String>,
    #[serde(alias = "correct")]
    correct_answer: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut bank = QuestionBank::new(parsed.bank.name);
    for q in parsed.questions {
        let difficulty: Difficulty = q.difficulty.parse().map_err(|e: String| {
            anyhow::anyhow!("{}: question '{}': {}", source_path.display(), q.question, e)
        })?;
        bank.insert(
            q.topic.trim(),
            difficulty,
            Question {
                question: q.question,
                options: q.options,
                correct_answer: q.correct_answer,
            },
        );
    }

    Ok(bank)
}

/// Recursively load and merge all `.toml` bank files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<QuestionBank> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(default_bank_name);
    let mut bank = QuestionBank::new(name);

    for path in paths {
        if path.is_dir() {
            bank.merge(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(file_bank) => bank.merge(file_bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(bank)
}

/// Load a bank from a file or directory path.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        parse_bank(path)
    }
}

/// A warning from bank validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// `topic/Difficulty` the warning applies to.
    pub pool: String,
    /// Question text (if the warning is about one question).
    pub question: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common authoring mistakes.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (topic, levels) in &bank.topics {
        // Every topic should be playable at every difficulty
        for difficulty in Difficulty::ALL {
            if levels.get(&difficulty).is_none_or(Vec::is_empty) {
                warnings.push(ValidationWarning {
                    pool: format!("{topic}/{difficulty}"),
                    question: None,
                    message: "no questions at this difficulty".into(),
                });
            }
        }

        for (difficulty, questions) in levels {
            let pool = format!("{topic}/{difficulty}");
            let mut seen = HashSet::new();

            for q in questions {
                let warn = |message: String| ValidationWarning {
                    pool: pool.clone(),
                    question: Some(q.question.clone()),
                    message,
                };

                if q.question.trim().is_empty() {
                    warnings.push(warn("question text is empty".into()));
                }
                if !seen.insert(q.question.as_str()) {
                    warnings.push(warn("duplicate question".into()));
                }
                if q.options.len() < 2 {
                    warnings.push(warn(format!(
                        "needs at least 2 options (has {})",
                        q.options.len()
                    )));
                }
                let distinct: HashSet<&str> = q.options.iter().map(String::as_str).collect();
                if distinct.len() != q.options.len() {
                    warnings.push(warn("duplicate options".into()));
                }
                if !q.has_option(&q.correct_answer) {
                    warnings.push(warn(format!(
                        "correct answer '{}' is not among the options",
                        q.correct_answer
                    )));
                }
            }
        }
    }

    warnings
}
