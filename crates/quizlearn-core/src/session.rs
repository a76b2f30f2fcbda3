//! The session store.
//!
//! One [`SessionStore`] holds everything a running quizlearn session knows:
//! the question bank, the student roster, who is logged in, the quiz in
//! progress, and the append-only attempt history. The front end owns the
//! store and passes it by `&mut` to each interaction.

use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::bank::QuestionBank;
use crate::engine::{Phase, QuestionFeedback, QuizSession};
use crate::error::QuizError;
use crate::model::{Answer, Attempt, Difficulty, Student};
use crate::traits::{Clock, SystemClock};

/// Greetings shown on login, drawn without repeats until all have been used.
pub const GREETINGS: [&str; 5] = [
    "Welcome",
    "Great to see you",
    "Greetings",
    "Good luck today",
    "Ready to learn",
];

pub struct SessionStore {
    bank: QuestionBank,
    students: Vec<Student>,
    /// Index into `students`.
    active_student: Option<usize>,
    greeting: Option<&'static str>,
    greeting_pool: Vec<&'static str>,
    quiz: Option<QuizSession>,
    history: Vec<Attempt>,
    clock: Box<dyn Clock>,
    rng: StdRng,
}

impl SessionStore {
    /// A store using the system clock and an OS-seeded RNG.
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            students: Vec::new(),
            active_student: None,
            greeting: None,
            greeting_pool: Vec::new(),
            quiz: None,
            history: Vec::new(),
            clock: Box::new(SystemClock),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Make question sampling and greetings reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Every student who has logged in, in registration order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn active_student(&self) -> Option<&Student> {
        self.active_student.map(|i| &self.students[i])
    }

    /// The greeting drawn at the last login.
    pub fn greeting(&self) -> Option<&str> {
        self.greeting
    }

    pub fn current_quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    /// Completed attempts, oldest first.
    pub fn history(&self) -> &[Attempt] {
        &self.history
    }

    /// The most recently submitted attempt.
    pub fn last_attempt(&self) -> Option<&Attempt> {
        self.history.last()
    }

    pub fn phase(&self) -> Phase {
        if self.active_student.is_none() {
            return Phase::NoSession;
        }
        self.quiz
            .as_ref()
            .map_or(Phase::Configuring, QuizSession::phase)
    }

    /// Log a student in, registering them on first login.
    ///
    /// Switching students discards any quiz in progress.
    pub fn login(&mut self, name: &str) -> Result<&Student, QuizError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(QuizError::EmptyStudentName);
        }

        self.quiz = None;
        let index = match self.students.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                let id = self.students.len() as u32 + 1;
                self.students.push(Student {
                    id,
                    name: name.to_string(),
                });
                tracing::info!(student = name, id, "registered new student");
                self.students.len() - 1
            }
        };
        self.active_student = Some(index);
        self.greeting = Some(self.next_greeting());
        tracing::info!(student = name, "student logged in");

        Ok(&self.students[index])
    }

    /// Log out, discarding any quiz in progress.
    pub fn logout(&mut self) {
        if let Some(student) = self.active_student() {
            tracing::info!(student = %student.name, "student logged out");
        }
        self.active_student = None;
        self.greeting = None;
        self.quiz = None;
    }

    /// Start a new quiz for the logged-in student, replacing any current one.
    pub fn initialize(
        &mut self,
        topic: &str,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<&QuizSession, QuizError> {
        let student = self.active_student().ok_or(QuizError::NotLoggedIn)?;
        let display_name = student.display_name();
        let now = self.clock.now();

        let quiz = QuizSession::initialize(
            &self.bank,
            display_name,
            topic,
            difficulty,
            count,
            &mut self.rng,
            now,
        )?;

        if let Some(previous) = &self.quiz {
            if !previous.is_completed() {
                tracing::debug!(quiz = %previous.id, "discarding unfinished quiz");
            }
        }
        tracing::info!(
            quiz = %quiz.id,
            student = %quiz.student,
            topic,
            %difficulty,
            requested = count,
            questions = quiz.total(),
            "quiz initialized"
        );

        Ok(self.quiz.insert(quiz))
    }

    /// Record an answer on the current quiz.
    pub fn record_answer(&mut self, index: usize, answer: Answer) -> Result<(), QuizError> {
        let quiz = self.active_quiz_mut()?;
        tracing::debug!(quiz = %quiz.id, index, answer = %answer, "recording answer");
        quiz.record_answer(index, answer)
    }

    /// Lock the current quiz's answers and return per-question feedback.
    pub fn validate(&mut self) -> Result<Vec<QuestionFeedback>, QuizError> {
        let quiz = self.active_quiz_mut()?;
        let feedback = quiz.validate()?;
        tracing::debug!(quiz = %quiz.id, "answers validated");
        Ok(feedback)
    }

    /// Grade the current quiz and append the attempt to the history.
    pub fn submit(&mut self) -> Result<&Attempt, QuizError> {
        let now = self.clock.now();
        let quiz = self.active_quiz_mut()?;
        let attempt = quiz.submit(now)?;
        tracing::info!(
            quiz = %quiz.id,
            student = %attempt.student,
            score = attempt.score,
            total = attempt.total,
            percentage = attempt.percentage,
            time_taken = attempt.time_taken,
            "quiz submitted"
        );

        self.history.push(attempt);
        Ok(&self.history[self.history.len() - 1])
    }

    /// Drop the current quiz so a new one can be configured.
    pub fn start_new_session(&mut self) {
        self.quiz = None;
    }

    fn active_quiz_mut(&mut self) -> Result<&mut QuizSession, QuizError> {
        if self.active_student.is_none() {
            return Err(QuizError::NotLoggedIn);
        }
        self.quiz.as_mut().ok_or(QuizError::NoActiveSession)
    }

    fn next_greeting(&mut self) -> &'static str {
        if self.greeting_pool.is_empty() {
            self.greeting_pool = GREETINGS.to_vec();
            self.greeting_pool.shuffle(&mut self.rng);
        }
        self.greeting_pool.pop().unwrap_or(GREETINGS[0])
    }
}
