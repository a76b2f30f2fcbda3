//! Quiz engine error types.
//!
//! These represent precondition failures when the front end drives the
//! session store out of order (answering after validation, submitting
//! before it) or with a selection that doesn't exist. None of them leave
//! the store in a modified state.

use thiserror::Error;

use crate::model::Difficulty;

/// Errors returned by the quiz engine and session store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// Login was attempted with a blank name.
    #[error("student name must not be empty")]
    EmptyStudentName,

    /// A quiz operation was attempted with nobody logged in.
    #[error("no student is logged in")]
    NotLoggedIn,

    /// The topic is not in the question bank.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    /// The topic exists but has no questions at this difficulty.
    #[error("no {difficulty} questions available for {topic}")]
    EmptyPool { topic: String, difficulty: Difficulty },

    /// The requested question count is not one of the allowed values.
    #[error("question count must be one of 1, 3, 5 or 10 (got {0})")]
    InvalidQuestionCount(usize),

    /// There is no quiz in progress.
    #[error("no active quiz")]
    NoActiveSession,

    /// The question index is outside the quiz.
    #[error("question {index} is out of range (quiz has {total} questions)")]
    InvalidQuestionIndex { index: usize, total: usize },

    /// The selected option is not one of the question's options.
    #[error("'{option}' is not an option for question {index}")]
    InvalidOption { index: usize, option: String },

    /// Answers were already validated and can no longer change.
    #[error("answers are locked after validation")]
    AnswersLocked,

    /// Submit was called before the answers were validated.
    #[error("answers must be validated before submitting")]
    NotValidated,

    /// The quiz has already been submitted to the history.
    #[error("quiz has already been submitted")]
    AlreadySubmitted,
}

impl QuizError {
    /// Returns `true` if the error is about the state of the session rather
    /// than the value the user typed, i.e. retrying the same input won't help
    /// until another action (login, start, validate) happens first.
    pub fn is_out_of_order(&self) -> bool {
        matches!(
            self,
            QuizError::NotLoggedIn
                | QuizError::NoActiveSession
                | QuizError::AnswersLocked
                | QuizError::NotValidated
                | QuizError::AlreadySubmitted
        )
    }
}
