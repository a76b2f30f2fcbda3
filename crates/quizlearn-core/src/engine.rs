//! The quiz engine.
//!
//! A [`QuizSession`] moves through `InProgress → ResultsShown → Completed`.
//! Answers can change only while in progress; validation locks them and
//! reveals the answer key; submission grades the quiz into an [`Attempt`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::{
    percentage, Answer, Attempt, Difficulty, Question, ATTEMPT_DATE_FORMAT, QUESTION_COUNTS,
};

/// Where the user is in the assessment flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Nobody is logged in.
    NoSession,
    /// Logged in, choosing topic, difficulty and count.
    Configuring,
    /// Answering questions.
    InProgress,
    /// Answers validated and locked; correct answers visible.
    ResultsShown,
    /// Submitted to the history.
    Completed,
}

/// Per-question result revealed by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFeedback {
    /// 0-based question position.
    pub index: usize,
    pub selected: Answer,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// An in-progress or finished quiz for one student.
#[derive(Debug, Clone)]
pub struct QuizSession {
    /// Identifier used to correlate log lines for this quiz.
    pub id: Uuid,
    /// Display name of the student taking the quiz.
    pub student: String,
    pub topic: String,
    pub difficulty: Difficulty,
    questions: Vec<Question>,
    answers: BTreeMap<usize, Answer>,
    start_time: NaiveDateTime,
    is_completed: bool,
    show_results: bool,
}

impl QuizSession {
    /// Start a quiz with `count` questions sampled without replacement from
    /// the `(topic, difficulty)` pool. A pool smaller than `count` yields
    /// every question in it, shuffled.
    pub fn initialize<R: Rng + ?Sized>(
        bank: &QuestionBank,
        student: impl Into<String>,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
        rng: &mut R,
        now: NaiveDateTime,
    ) -> Result<Self, QuizError> {
        if !QUESTION_COUNTS.contains(&count) {
            return Err(QuizError::InvalidQuestionCount(count));
        }
        let pool = bank
            .pool(topic, difficulty)
            .ok_or_else(|| QuizError::UnknownTopic(topic.to_string()))?;
        if pool.is_empty() {
            return Err(QuizError::EmptyPool {
                topic: topic.to_string(),
                difficulty,
            });
        }

        let questions = sample_questions(pool, count, rng);
        let answers = (0..questions.len()).map(|i| (i, Answer::Unanswered)).collect();

        Ok(Self {
            id: Uuid::new_v4(),
            student: student.into(),
            topic: topic.to_string(),
            difficulty,
            questions,
            answers,
            start_time: now,
            is_completed: false,
            show_results: false,
        })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the quiz.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The recorded answer for a question, if the index is in range.
    pub fn answer(&self, index: usize) -> Option<&Answer> {
        self.answers.get(&index)
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn show_results(&self) -> bool {
        self.show_results
    }

    pub fn phase(&self) -> Phase {
        if self.is_completed {
            Phase::Completed
        } else if self.show_results {
            Phase::ResultsShown
        } else {
            Phase::InProgress
        }
    }

    /// Questions with a selected option.
    pub fn answered_count(&self) -> usize {
        self.answers.values().filter(|a| a.is_answered()).count()
    }

    /// Fraction of questions answered, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answered_count() as f64 / self.questions.len() as f64
    }

    /// Record (or clear, with [`Answer::Unanswered`]) the answer to a question.
    pub fn record_answer(&mut self, index: usize, answer: Answer) -> Result<(), QuizError> {
        if self.is_completed {
            return Err(QuizError::AlreadySubmitted);
        }
        if self.show_results {
            return Err(QuizError::AnswersLocked);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::InvalidQuestionIndex {
                index,
                total: self.questions.len(),
            })?;
        if let Answer::Selected(option) = &answer {
            if !question.has_option(option) {
                return Err(QuizError::InvalidOption {
                    index,
                    option: option.clone(),
                });
            }
        }

        self.answers.insert(index, answer);
        Ok(())
    }

    /// Lock the answers and reveal which ones are correct.
    pub fn validate(&mut self) -> Result<Vec<QuestionFeedback>, QuizError> {
        if self.is_completed {
            return Err(QuizError::AlreadySubmitted);
        }
        self.show_results = true;
        Ok(self.feedback())
    }

    /// Per-question correctness for the current answers.
    pub fn feedback(&self) -> Vec<QuestionFeedback> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = self.answers.get(&index).cloned().unwrap_or_default();
                QuestionFeedback {
                    index,
                    is_correct: selected.is_correct_for(question),
                    selected,
                    correct_answer: question.correct_answer.clone(),
                }
            })
            .collect()
    }

    /// Number of correct answers. Unanswered questions count as wrong.
    pub fn score(&self) -> u32 {
        self.questions
            .iter()
            .enumerate()
            .filter(|(i, q)| self.answers.get(i).is_some_and(|a| a.is_correct_for(q)))
            .count() as u32
    }

    /// Grade the quiz and mark it completed. The returned attempt is the
    /// record the caller appends to the history.
    pub fn submit(&mut self, now: NaiveDateTime) -> Result<Attempt, QuizError> {
        if self.is_completed {
            return Err(QuizError::AlreadySubmitted);
        }
        if !self.show_results {
            return Err(QuizError::NotValidated);
        }

        let score = self.score();
        let total = self.questions.len() as u32;
        // num_seconds truncates toward zero; a clock that went backwards clamps to 0
        let time_taken = (now - self.start_time).num_seconds().max(0) as u64;

        self.is_completed = true;

        Ok(Attempt {
            student: self.student.clone(),
            topic: self.topic.clone(),
            difficulty: self.difficulty,
            score,
            total,
            percentage: percentage(score, total),
            date: now.format(ATTEMPT_DATE_FORMAT).to_string(),
            time_taken,
        })
    }
}

/// Pick `min(count, pool.len())` distinct questions in random order.
pub fn sample_questions<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let mut selected = pool.to_vec();
    selected.shuffle(rng);
    selected.truncate(count.min(pool.len()));
    selected
}
