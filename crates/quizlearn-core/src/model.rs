//! Core data model types for quizlearn.
//!
//! These are the fundamental types shared by the quiz engine, the session
//! store, and the analytics: students, questions, answers, and the
//! immutable attempt records that make up the history.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Question counts a quiz can be initialized with.
pub const QUESTION_COUNTS: [usize; 4] = [1, 3, 5, 10];

/// Timestamp format stored in [`Attempt::date`].
pub const ATTEMPT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// 1-based registration order.
    pub id: u32,
    /// Name exactly as entered at first login.
    pub name: String,
}

impl Student {
    /// Name with each word capitalized, as shown to the user.
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }
}

/// Quiz difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A multiple-choice question from the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question text.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// The option that counts as correct.
    #[serde(alias = "correct")]
    pub correct_answer: String,
}

impl Question {
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// A student's response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// No option chosen. Scored as incorrect.
    #[default]
    Unanswered,
    /// The chosen option text.
    Selected(String),
}

impl Answer {
    pub fn selected(&self) -> Option<&str> {
        match self {
            Answer::Selected(option) => Some(option),
            Answer::Unanswered => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, Answer::Selected(_))
    }

    /// Whether this answer matches the question's answer key.
    pub fn is_correct_for(&self, question: &Question) -> bool {
        self.selected() == Some(question.correct_answer.as_str())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Selected(option) => write!(f, "{option}"),
            Answer::Unanswered => write!(f, "(unanswered)"),
        }
    }
}

/// A completed, submitted quiz. Immutable once appended to the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Display name of the student who took the quiz.
    pub student: String,
    pub topic: String,
    pub difficulty: Difficulty,
    /// Number of correctly answered questions.
    pub score: u32,
    /// Number of questions in the quiz.
    pub total: u32,
    /// `round(100 * score / total)`, see [`percentage`].
    pub percentage: u8,
    /// Submission time formatted with [`ATTEMPT_DATE_FORMAT`].
    pub date: String,
    /// Whole seconds between initialization and submission.
    pub time_taken: u64,
}

impl Attempt {
    /// Whether this attempt meets the given pass mark.
    pub fn passed(&self, pass_mark: u8) -> bool {
        self.percentage >= pass_mark
    }
}

/// Percentage of correct answers, rounded half to even (`1/8` is 12).
///
/// Returns 0 for an empty quiz.
pub fn percentage(score: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(score.min(total)) * 100.0 / f64::from(total)).round_ties_even();
    pct as u8
}

/// Capitalize the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}
